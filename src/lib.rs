#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! Tiling texture paints sampled under an extra affine transform.
//!
//! [`TexturePaint`] repeats an image across the plane, one copy per anchor-sized cell.
//! [`TransformedTexturePaint`] wraps it with a pattern transform applied before the
//! user-to-device transform of each fill, so patterns can be rotated, sheared or scaled
//! independently of the geometry they fill.
//!
//! ```no_run
//! use tilepaint::{Affine, Rect, Surface, TransformedTexturePaint, noise_image};
//!
//! # fn main() -> tilepaint::TilePaintResult<()> {
//! let paint = TransformedTexturePaint::new(
//!     noise_image(64, 64, 7)?,
//!     Rect::new(5.0, 5.0, 105.0, 105.0),
//!     Some(Affine::new([1.0, 0.1, 0.1, 1.0, 0.0, 0.0])),
//! )?;
//! let mut surface = Surface::new(256, 256)?;
//! surface.fill_rect(Rect::new(0.0, 0.0, 256.0, 256.0), &paint, Affine::IDENTITY, None)?;
//! surface.save_png("out.png".as_ref())?;
//! # Ok(())
//! # }
//! ```

mod assets;
mod foundation;
mod job;
mod paint;
mod render;
pub mod transform;

pub use assets::decode::{decode_image, load_image};
pub use assets::synth::{checkerboard, noise_image};
pub use foundation::core::{Affine, DeviceRect, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{TilePaintError, TilePaintResult};
pub use job::TileJob;
pub use paint::color::{ColorModel, Transparency};
pub use paint::hints::{
    ColorRendering, HintKey, HintValue, Interpolation, Rendering, RenderingHints, ResolvedHints,
};
pub use paint::texture::{TextureContext, TexturePaint};
pub use paint::transformed::TransformedTexturePaint;
pub use paint::{Paint, PaintContext, Raster};
pub use render::surface::{Surface, SurfaceOpts};
