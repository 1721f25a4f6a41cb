use std::sync::Arc;

use image::RgbaImage;

use crate::foundation::core::{Affine, DeviceRect, Rect};
use crate::foundation::error::TilePaintResult;
use crate::paint::color::{ColorModel, Transparency};
use crate::paint::hints::{RenderingHints, ResolvedHints};
use crate::paint::texture::TexturePaint;
use crate::paint::{Paint, PaintContext};
use crate::transform::affine;

/// A [`TexturePaint`] whose pattern space is warped by an extra affine transform.
///
/// The paint wraps the tiling primitive instead of specializing it: every query except context
/// derivation is forwarded unchanged, and context derivation substitutes
/// `device_transform * transform` for the device transform before delegating.
#[derive(Clone, Debug)]
pub struct TransformedTexturePaint {
    texture: TexturePaint,
    transform: Affine,
}

impl TransformedTexturePaint {
    /// Build from an image, its anchor rectangle and an optional pattern transform.
    ///
    /// `None` means identity. Anchor/image validation is [`TexturePaint::new`]'s and its error
    /// is returned as-is.
    pub fn new(
        image: Arc<RgbaImage>,
        anchor: Rect,
        transform: Option<Affine>,
    ) -> TilePaintResult<Self> {
        Ok(Self::from_texture(TexturePaint::new(image, anchor)?, transform))
    }

    /// Wrap an existing tiling paint.
    pub fn from_texture(texture: TexturePaint, transform: Option<Affine>) -> Self {
        Self {
            texture,
            transform: transform.unwrap_or_else(affine::identity),
        }
    }

    /// The pattern transform (a copy).
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// The wrapped tiling paint.
    pub fn texture(&self) -> &TexturePaint {
        &self.texture
    }

    /// See [`TexturePaint::anchor_rect`].
    pub fn anchor_rect(&self) -> Rect {
        self.texture.anchor_rect()
    }

    /// See [`TexturePaint::image`].
    pub fn image(&self) -> &Arc<RgbaImage> {
        self.texture.image()
    }

    /// Transform the tiling primitive samples with under `device_transform`.
    pub fn effective_transform(&self, device_transform: Affine) -> Affine {
        affine::concatenate(device_transform, self.transform)
    }
}

impl Paint for TransformedTexturePaint {
    fn create_context(
        &self,
        color_model: ColorModel,
        device_bounds: DeviceRect,
        user_bounds: Rect,
        xform: Affine,
        hints: Option<&RenderingHints>,
    ) -> TilePaintResult<Box<dyn PaintContext>> {
        let effective = self.effective_transform(xform);
        let hints = ResolvedHints::normalize(hints);
        tracing::trace!(
            ?device_bounds,
            effective = ?effective.as_coeffs(),
            identity = affine::is_identity(self.transform),
            defaulted_hints = hints.is_defaulted(),
            "transformed texture context"
        );
        self.texture.create_context(
            color_model,
            device_bounds,
            user_bounds,
            effective,
            Some(hints.get()),
        )
    }

    fn transparency(&self) -> Transparency {
        self.texture.transparency()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/transformed.rs"]
mod tests;
