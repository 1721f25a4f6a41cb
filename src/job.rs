//! JSON job descriptions: one transformed texture fill onto a fresh surface.
//!
//! ```json
//! {
//!   "width": 256, "height": 256,
//!   "clear_rgba": [18, 20, 28, 255],
//!   "image": "textures/brick.png",
//!   "anchor": [5, 5, 100, 100],
//!   "transform": [1, 0.1, 0.1, 1, 0, 0],
//!   "hints": { "interpolation": "bilinear" }
//! }
//! ```
//!
//! `image` is a path relative to the render root, or `checkerboard:<cell>` for a synthetic
//! black/white board of `2 * cell` pixels square. Rectangles are `[x, y, width, height]`,
//! transforms are `kurbo` coefficient order `[a, b, c, d, e, f]`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use image::RgbaImage;

use crate::assets::{decode, synth};
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::{TilePaintError, TilePaintResult};
use crate::paint::hints::RenderingHints;
use crate::paint::transformed::TransformedTexturePaint;
use crate::render::surface::{Surface, SurfaceOpts};
use crate::transform::affine;

const CHECKERBOARD_PREFIX: &str = "checkerboard:";
/// Largest accepted `checkerboard:<cell>`; the board is `2 * cell` pixels square.
const MAX_CHECKER_CELL: u32 = 8192;

/// A single fill job.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileJob {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Straight-alpha background; transparent when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_rgba: Option<[u8; 4]>,
    /// Texture source (relative path or `checkerboard:<cell>`).
    pub image: String,
    /// Anchor rectangle `[x, y, width, height]` in pattern space.
    pub anchor: [f64; 4],
    /// Pattern transform; identity when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<[f64; 6]>,
    /// User-to-device transform for the fill; identity when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_transform: Option<[f64; 6]>,
    /// Filled rectangle `[x, y, width, height]` in user space; the whole canvas when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<[f64; 4]>,
    /// Rendering hints; normalized to defaults when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hints: Option<RenderingHints>,
    /// Row-parallel fill.
    #[serde(default)]
    pub parallel: bool,
}

impl TileJob {
    /// Parse and validate a job from JSON text.
    pub fn from_json_str(s: &str) -> TilePaintResult<Self> {
        let job: Self =
            serde_json::from_str(s).map_err(|e| TilePaintError::serde(e.to_string()))?;
        job.validate()?;
        Ok(job)
    }

    /// Read, parse and validate a job file.
    pub fn from_path(path: &Path) -> TilePaintResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read job '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> TilePaintResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TilePaintError::serde(e.to_string()))
    }

    /// Check sizes, rectangles and transforms.
    pub fn validate(&self) -> TilePaintResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TilePaintError::config(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        let anchor = self.anchor_rect()?;
        if anchor.width() <= 0.0 || anchor.height() <= 0.0 {
            return Err(TilePaintError::config(format!(
                "anchor width/height must be > 0, got {:?}",
                self.anchor
            )));
        }
        if let Some(fill) = self.fill {
            let r = rect_from_xywh("fill", fill)?;
            if r.width() < 0.0 || r.height() < 0.0 {
                return Err(TilePaintError::config(format!(
                    "fill width/height must be >= 0, got {fill:?}"
                )));
            }
        }
        self.pattern_transform()?;
        self.device_affine()?;
        if self.image.trim().is_empty() {
            return Err(TilePaintError::config("image must be set"));
        }
        if let Some(cell) = self.image.strip_prefix(CHECKERBOARD_PREFIX) {
            parse_cell(cell)?;
        }
        Ok(())
    }

    /// Anchor as a rectangle.
    pub fn anchor_rect(&self) -> TilePaintResult<Rect> {
        rect_from_xywh("anchor", self.anchor)
    }

    /// Pattern transform (identity when unset).
    pub fn pattern_transform(&self) -> TilePaintResult<Option<Affine>> {
        self.transform
            .map(|c| {
                affine::from_coeffs(c)
                    .map_err(|e| TilePaintError::config(format!("transform: {e}")))
            })
            .transpose()
    }

    /// Device transform (identity when unset).
    pub fn device_affine(&self) -> TilePaintResult<Affine> {
        match self.device_transform {
            Some(c) => affine::from_coeffs(c)
                .map_err(|e| TilePaintError::config(format!("device_transform: {e}"))),
            None => Ok(affine::identity()),
        }
    }

    /// Load or synthesize the texture.
    pub fn load_image(&self, root: &Path) -> TilePaintResult<Arc<RgbaImage>> {
        if let Some(cell) = self.image.strip_prefix(CHECKERBOARD_PREFIX) {
            let cell = parse_cell(cell)?;
            let side = cell * 2;
            return synth::checkerboard(side, side, cell, [255, 255, 255, 255], [0, 0, 0, 255]);
        }
        decode::load_image(&root.join(&self.image))
    }

    /// Render the job onto a new surface; relative image paths resolve against `root`.
    #[tracing::instrument(skip(self), fields(image = %self.image))]
    pub fn render(&self, root: &Path) -> TilePaintResult<Surface> {
        self.validate()?;
        let paint = TransformedTexturePaint::new(
            self.load_image(root)?,
            self.anchor_rect()?,
            self.pattern_transform()?,
        )?;
        let device = self.device_affine()?;
        let opts = SurfaceOpts::default()
            .with_clear_rgba(self.clear_rgba)
            .with_parallel(self.parallel);
        let mut surface = Surface::with_opts(self.width, self.height, opts)?;

        let fill = match self.fill {
            Some(f) => rect_from_xywh("fill", f)?,
            None => affine::invert(device)?.transform_rect_bbox(surface.bounds().to_rect()),
        };
        let covered = surface.fill_rect(fill, &paint, device, self.hints.as_ref())?;
        tracing::debug!(covered, "job rendered");
        Ok(surface)
    }
}

fn rect_from_xywh(what: &str, v: [f64; 4]) -> TilePaintResult<Rect> {
    if v.iter().any(|c| !c.is_finite()) {
        return Err(TilePaintError::config(format!("{what} must be finite, got {v:?}")));
    }
    Ok(Rect::new(v[0], v[1], v[0] + v[2], v[1] + v[3]))
}

fn parse_cell(s: &str) -> TilePaintResult<u32> {
    match s.trim().parse::<u32>() {
        Ok(n) if (1..=MAX_CHECKER_CELL).contains(&n) => Ok(n),
        _ => Err(TilePaintError::config(format!(
            "checkerboard cell must be an integer in 1..={MAX_CHECKER_CELL}, got '{s}'"
        ))),
    }
}

#[cfg(test)]
#[path = "../tests/unit/job.rs"]
mod tests;
