use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::foundation::error::{TilePaintError, TilePaintResult};

/// Two-color checkerboard; the cell at `(0, 0)` is `even`.
pub fn checkerboard(
    width: u32,
    height: u32,
    cell: u32,
    even: [u8; 4],
    odd: [u8; 4],
) -> TilePaintResult<Arc<RgbaImage>> {
    if cell == 0 {
        return Err(TilePaintError::invalid_argument(format!(
            "checkerboard needs a positive cell, got {cell}"
        )));
    }
    check_size("checkerboard", width, height)?;
    Ok(Arc::new(RgbaImage::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgba(even)
        } else {
            Rgba(odd)
        }
    })))
}

/// Seeded per-pixel noise over all four channels (alpha included).
pub fn noise_image(width: u32, height: u32, seed: u64) -> TilePaintResult<Arc<RgbaImage>> {
    check_size("noise image", width, height)?;
    Ok(Arc::new(RgbaImage::from_fn(width, height, |x, y| {
        let mut key = [0u8; 8];
        key[..4].copy_from_slice(&x.to_le_bytes());
        key[4..].copy_from_slice(&y.to_le_bytes());
        let h = xxhash_rust::xxh3::xxh3_64_with_seed(&key, seed);
        Rgba((h as u32).to_le_bytes())
    })))
}

/// Largest synthetic image, in pixels.
const MAX_SYNTH_PIXELS: u64 = 1 << 28;

// `RgbaImage::from_fn` panics when the buffer length overflows; reject such sizes up front.
fn check_size(what: &str, width: u32, height: u32) -> TilePaintResult<()> {
    if width == 0 || height == 0 {
        return Err(TilePaintError::invalid_argument(format!(
            "{what} needs positive size, got {width}x{height}"
        )));
    }
    let pixels = u64::from(width) * u64::from(height);
    let fits = usize::try_from(pixels)
        .ok()
        .and_then(|n| n.checked_mul(4))
        .is_some();
    if !fits || pixels > MAX_SYNTH_PIXELS {
        return Err(TilePaintError::invalid_argument(format!(
            "{what} size {width}x{height} exceeds {MAX_SYNTH_PIXELS} pixels"
        )));
    }
    Ok(())
}
