//! Paint capability contract and the tiling paints built on it.
//!
//! A [`Paint`] is a fill style. When a shape is filled, the renderer asks the paint for a
//! [`PaintContext`] bound to the device bounds, the user-to-device transform and the rendering
//! hints in effect, then pulls device-pixel samples from it.

use std::fmt::Debug;

use crate::foundation::core::{Affine, DeviceRect, Rect};
use crate::foundation::error::TilePaintResult;

pub(crate) mod color;
pub(crate) mod hints;
pub(crate) mod texture;
pub(crate) mod transformed;

use color::{ColorModel, Transparency};
use hints::RenderingHints;

/// A fill style that can produce per-pixel samples for one fill operation.
pub trait Paint: Send + Sync + Debug {
    /// Derive a sampling context for one fill.
    ///
    /// - `color_model`: layout the renderer wants samples in
    /// - `device_bounds`: device pixels about to be filled
    /// - `user_bounds`: the same region in user space
    /// - `xform`: user-to-device transform in effect
    /// - `hints`: optional rendering hints
    fn create_context(
        &self,
        color_model: ColorModel,
        device_bounds: DeviceRect,
        user_bounds: Rect,
        xform: Affine,
        hints: Option<&RenderingHints>,
    ) -> TilePaintResult<Box<dyn PaintContext>>;

    /// Transparency classification of every sample this paint can produce.
    fn transparency(&self) -> Transparency;
}

/// Per-fill sampler returned by [`Paint::create_context`].
pub trait PaintContext: Send + Sync {
    /// Layout of the samples returned by [`PaintContext::sample`].
    fn color_model(&self) -> ColorModel;

    /// Device bounds the context was derived for.
    fn bounds(&self) -> DeviceRect;

    /// Sample at device pixel `(x, y)`.
    fn sample(&self, x: i32, y: i32) -> [u8; 4];

    /// Sample every pixel of `region` into a tightly packed raster.
    fn raster(&self, region: DeviceRect) -> Raster {
        let mut data = Vec::with_capacity(region.area() as usize * 4);
        for row in 0..region.height {
            let y = (i64::from(region.y) + i64::from(row)) as i32;
            for col in 0..region.width {
                let x = (i64::from(region.x) + i64::from(col)) as i32;
                data.extend_from_slice(&self.sample(x, y));
            }
        }
        Raster {
            bounds: region,
            color_model: self.color_model(),
            data,
        }
    }
}

/// A block of samples produced by a [`PaintContext`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Device pixels covered.
    pub bounds: DeviceRect,
    /// Layout of `data`.
    pub color_model: ColorModel,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl Raster {
    /// Sample at device pixel `(x, y)`, if inside [`Raster::bounds`].
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let col = (i64::from(x) - i64::from(self.bounds.x)) as usize;
        let row = (i64::from(y) - i64::from(self.bounds.y)) as usize;
        let idx = (row * self.bounds.width as usize + col) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
