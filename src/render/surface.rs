use std::path::Path;

use anyhow::Context as _;
use image::RgbaImage;
use rayon::prelude::*;

use crate::foundation::core::{Affine, DeviceRect, Point, Rect, Rgba8Premul};
use crate::foundation::error::{TilePaintError, TilePaintResult};
use crate::foundation::math::{premultiply, src_over, unpremultiply};
use crate::paint::Paint;
use crate::paint::color::ColorModel;
use crate::paint::hints::RenderingHints;
use crate::transform::affine;

/// Options for a [`Surface`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceOpts {
    /// Straight-alpha RGBA8 the surface starts out as (transparent when unset).
    pub clear_rgba: Option<[u8; 4]>,
    /// Sample rows on the rayon pool.
    pub parallel: bool,
}

impl SurfaceOpts {
    /// Return options with a configured clear color.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }

    /// Return options with row-parallel fills switched on or off.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Premultiplied RGBA8 pixel target.
#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
    opts: SurfaceOpts,
}

impl Surface {
    /// Transparent surface with default options.
    pub fn new(width: u32, height: u32) -> TilePaintResult<Self> {
        Self::with_opts(width, height, SurfaceOpts::default())
    }

    /// Surface with explicit options; cleared to `opts.clear_rgba` when set.
    pub fn with_opts(width: u32, height: u32, opts: SurfaceOpts) -> TilePaintResult<Self> {
        if width == 0 || height == 0 {
            return Err(TilePaintError::invalid_argument(format!(
                "surface size must be > 0, got {width}x{height}"
            )));
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(TilePaintError::invalid_argument(format!(
                "surface size {width}x{height} exceeds the pixel grid"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| TilePaintError::invalid_argument("surface byte size overflow"))?;
        let mut out = Self {
            width,
            height,
            data: vec![0; len],
            opts,
        };
        if let Some(rgba) = opts.clear_rgba {
            out.clear(rgba);
        }
        Ok(out)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Options the surface was created with.
    pub fn opts(&self) -> SurfaceOpts {
        self.opts
    }

    /// Every pixel of the surface.
    pub fn bounds(&self) -> DeviceRect {
        DeviceRect::new(0, 0, self.width, self.height)
    }

    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Overwrite every pixel with a straight-alpha color.
    pub fn clear(&mut self, rgba: [u8; 4]) {
        let px = premultiply(rgba);
        for dst in self.data.chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }

    /// Pixel at `(x, y)`, if inside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8Premul> {
        if !self.bounds().contains(x, y) {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some(Rgba8Premul::from_array([px[0], px[1], px[2], px[3]]))
    }

    /// Fill `rect` (user space) mapped through `transform` with `paint`.
    ///
    /// A pixel is covered when its centre maps back inside `rect`; covered pixels are blended
    /// with premultiplied source-over. Returns the number of covered pixels.
    #[tracing::instrument(
        level = "debug",
        skip(self, paint, hints),
        fields(w = self.width, h = self.height)
    )]
    pub fn fill_rect(
        &mut self,
        rect: Rect,
        paint: &dyn Paint,
        transform: Affine,
        hints: Option<&RenderingHints>,
    ) -> TilePaintResult<u64> {
        if !rect.is_finite() {
            return Err(TilePaintError::invalid_argument(format!(
                "fill rect must be finite, got {rect:?}"
            )));
        }
        let rect = rect.abs();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return Ok(0);
        }
        let inverse = affine::invert(transform)?;
        let device =
            DeviceRect::cover(transform.transform_rect_bbox(rect))?.intersect(self.bounds());
        if device.is_empty() {
            return Ok(0);
        }

        let ctx = paint.create_context(ColorModel::Rgba8Premul, device, rect, transform, hints)?;
        let ctx = &*ctx;

        let stride = self.width as usize * 4;
        let top = device.y as usize;
        let bottom = device.bottom() as usize;
        let (x0, x1) = (device.x, device.right() as i32);
        let rows = &mut self.data[top * stride..bottom * stride];

        let fill_row = |(i, row): (usize, &mut [u8])| -> u64 {
            let y = device.y + i as i32;
            let mut covered = 0u64;
            for x in x0..x1 {
                let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if !rect.contains(p) {
                    continue;
                }
                let idx = x as usize * 4;
                let dst = &mut row[idx..idx + 4];
                let out = src_over([dst[0], dst[1], dst[2], dst[3]], ctx.sample(x, y));
                dst.copy_from_slice(&out);
                covered += 1;
            }
            covered
        };

        let covered: u64 = if self.opts.parallel {
            rows.par_chunks_mut(stride).enumerate().map(fill_row).sum()
        } else {
            rows.chunks_mut(stride).enumerate().map(fill_row).sum()
        };
        tracing::debug!(?device, covered, "fill_rect");
        Ok(covered)
    }

    /// Stable 64-bit hash of size and pixels.
    pub fn fingerprint(&self) -> u64 {
        let mut h = xxhash_rust::xxh3::Xxh3::new();
        h.update(&self.width.to_le_bytes());
        h.update(&self.height.to_le_bytes());
        h.update(&self.data);
        h.digest()
    }

    /// Convert to a straight-alpha image.
    pub fn to_rgba_image(&self) -> TilePaintResult<RgbaImage> {
        let mut raw = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            raw.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        RgbaImage::from_raw(self.width, self.height, raw)
            .ok_or_else(|| TilePaintError::invalid_argument("surface buffer size mismatch"))
    }

    /// Write the surface as PNG (straight alpha).
    pub fn save_png(&self, path: &Path) -> TilePaintResult<()> {
        self.to_rgba_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
