use image::RgbaImage;

/// Pixel layout a paint context produces samples in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ColorModel {
    /// RGBA8 with color channels multiplied by alpha.
    #[default]
    Rgba8Premul,
    /// RGBA8 with straight (unassociated) alpha.
    Rgba8,
}

impl ColorModel {
    /// Whether samples in this model carry premultiplied color.
    pub fn is_premultiplied(self) -> bool {
        matches!(self, Self::Rgba8Premul)
    }

    pub(crate) fn encode_straight(self, px: [u8; 4]) -> [u8; 4] {
        match self {
            Self::Rgba8Premul => crate::foundation::math::premultiply(px),
            Self::Rgba8 => px,
        }
    }
}

/// Transparency classification of a paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Transparency {
    /// Every sample is fully opaque.
    Opaque,
    /// Every sample is either fully opaque or fully transparent.
    Bitmask,
    /// Samples may carry partial alpha.
    Translucent,
}

impl Transparency {
    /// Classify an image by scanning its alpha channel.
    pub fn of_image(image: &RgbaImage) -> Self {
        let mut class = Self::Opaque;
        for px in image.pixels() {
            match px.0[3] {
                255 => {}
                0 => class = Self::Bitmask,
                _ => return Self::Translucent,
            }
        }
        class
    }

    /// `true` unless every sample is fully opaque.
    pub fn has_alpha(self) -> bool {
        !matches!(self, Self::Opaque)
    }
}
