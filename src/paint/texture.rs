use std::sync::Arc;

use image::RgbaImage;

use crate::foundation::core::{Affine, DeviceRect, Point, Rect};
use crate::foundation::error::{TilePaintError, TilePaintResult};
use crate::foundation::math::{lerp_rgba8, premultiply, round_rgba8, unpremultiply};
use crate::paint::color::{ColorModel, Transparency};
use crate::paint::hints::{Interpolation, RenderingHints};
use crate::paint::{Paint, PaintContext};
use crate::transform::affine;

/// Tiling paint: `image` stretched onto `anchor` and repeated along both axes without bound.
///
/// The image is shared, not copied; callers must not mutate it while the paint is in use.
#[derive(Clone, Debug)]
pub struct TexturePaint {
    image: Arc<RgbaImage>,
    anchor: Rect,
    transparency: Transparency,
}

impl TexturePaint {
    /// Build a tiling paint.
    ///
    /// Fails with [`TilePaintError::InvalidArgument`] for an empty image or an anchor rectangle
    /// whose width or height is not strictly positive and finite.
    pub fn new(image: Arc<RgbaImage>, anchor: Rect) -> TilePaintResult<Self> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Err(TilePaintError::invalid_argument(format!(
                "texture image must be non-empty, got {w}x{h}"
            )));
        }
        if !anchor.is_finite() || anchor.width() <= 0.0 || anchor.height() <= 0.0 {
            return Err(TilePaintError::invalid_argument(format!(
                "anchor rectangle must have positive finite size, got {anchor:?}"
            )));
        }
        let transparency = Transparency::of_image(&image);
        tracing::debug!(w, h, ?anchor, ?transparency, "texture paint");
        Ok(Self {
            image,
            anchor,
            transparency,
        })
    }

    /// Rectangle in pattern space one copy of the image is mapped onto.
    pub fn anchor_rect(&self) -> Rect {
        self.anchor
    }

    /// Source image.
    pub fn image(&self) -> &Arc<RgbaImage> {
        &self.image
    }

    pub(crate) fn make_context(
        &self,
        color_model: ColorModel,
        device_bounds: DeviceRect,
        xform: Affine,
        interpolation: Interpolation,
    ) -> TilePaintResult<TextureContext> {
        let inverse = affine::invert(xform)?;
        let (w, h) = self.image.dimensions();
        Ok(TextureContext {
            image: Arc::clone(&self.image),
            width: w,
            height: h,
            origin: Point::new(self.anchor.x0, self.anchor.y0),
            tile_w: self.anchor.width(),
            tile_h: self.anchor.height(),
            inverse,
            interpolation,
            color_model,
            bounds: device_bounds,
        })
    }
}

impl Paint for TexturePaint {
    fn create_context(
        &self,
        color_model: ColorModel,
        device_bounds: DeviceRect,
        _user_bounds: Rect,
        xform: Affine,
        hints: Option<&RenderingHints>,
    ) -> TilePaintResult<Box<dyn PaintContext>> {
        let interpolation = hints
            .map(RenderingHints::resolve_interpolation)
            .unwrap_or_default();
        tracing::trace!(?device_bounds, ?interpolation, "texture context");
        let ctx = self.make_context(color_model, device_bounds, xform, interpolation)?;
        Ok(Box::new(ctx))
    }

    fn transparency(&self) -> Transparency {
        self.transparency
    }
}

/// Sampler for one fill with a [`TexturePaint`].
#[derive(Clone, Debug)]
pub struct TextureContext {
    image: Arc<RgbaImage>,
    width: u32,
    height: u32,
    origin: Point,
    tile_w: f64,
    tile_h: f64,
    inverse: Affine,
    interpolation: Interpolation,
    color_model: ColorModel,
    bounds: DeviceRect,
}

impl TextureContext {
    /// Device-to-pattern transform used for sampling.
    pub fn inverse_transform(&self) -> Affine {
        self.inverse
    }

    /// Filter in use.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Position of device pixel `(x, y)`'s centre in texel units, reduced into one tile.
    ///
    /// Both components are in `[0, width]` / `[0, height]`.
    pub fn texel_position(&self, x: i32, y: i32) -> (f64, f64) {
        let p = self.inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        self.pattern_to_texel(p)
    }

    fn pattern_to_texel(&self, p: Point) -> (f64, f64) {
        let u = ((p.x - self.origin.x) / self.tile_w).rem_euclid(1.0);
        let v = ((p.y - self.origin.y) / self.tile_h).rem_euclid(1.0);
        (u * f64::from(self.width), v * f64::from(self.height))
    }

    fn texel(&self, ix: i64, iy: i64) -> [u8; 4] {
        let x = ix.rem_euclid(i64::from(self.width)) as u32;
        let y = iy.rem_euclid(i64::from(self.height)) as u32;
        self.image.get_pixel(x, y).0
    }

    fn nearest(&self, u: f64, v: f64) -> [u8; 4] {
        let ix = (u.floor() as i64).clamp(0, i64::from(self.width) - 1);
        let iy = (v.floor() as i64).clamp(0, i64::from(self.height) - 1);
        self.color_model.encode_straight(self.texel(ix, iy))
    }

    // Filtering happens on premultiplied values so transparent texels do not bleed color.
    fn bilinear(&self, u: f64, v: f64) -> [u8; 4] {
        let fx = u - 0.5;
        let fy = v - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (ix, iy) = (x0 as i64, y0 as i64);

        let p00 = premultiply(self.texel(ix, iy));
        let p10 = premultiply(self.texel(ix + 1, iy));
        let p01 = premultiply(self.texel(ix, iy + 1));
        let p11 = premultiply(self.texel(ix + 1, iy + 1));

        let top = round_rgba8(lerp_rgba8(p00, p10, tx));
        let bottom = round_rgba8(lerp_rgba8(p01, p11, tx));
        let px = round_rgba8(lerp_rgba8(top, bottom, ty));
        let px = [px[0].min(px[3]), px[1].min(px[3]), px[2].min(px[3]), px[3]];
        match self.color_model {
            ColorModel::Rgba8Premul => px,
            ColorModel::Rgba8 => unpremultiply(px),
        }
    }
}

impl PaintContext for TextureContext {
    fn color_model(&self) -> ColorModel {
        self.color_model
    }

    fn bounds(&self) -> DeviceRect {
        self.bounds
    }

    fn sample(&self, x: i32, y: i32) -> [u8; 4] {
        let (u, v) = self.texel_position(x, y);
        match self.interpolation {
            Interpolation::NearestNeighbor => self.nearest(u, v),
            Interpolation::Bilinear => self.bilinear(u, v),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/texture.rs"]
mod tests;
