use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;

use crate::foundation::error::{TilePaintError, TilePaintResult};

/// Decode encoded image bytes into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> TilePaintResult<Arc<RgbaImage>> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(TilePaintError::invalid_argument("decoded image is empty"));
    }
    Ok(Arc::new(rgba))
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> TilePaintResult<Arc<RgbaImage>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
