//! Affine transform helpers.
//!
//! Concatenation follows the "transform then concatenate" convention: `concatenate(base, local)`
//! maps a point through `local` first and `base` second, which is `base * local` in `kurbo`.

use crate::foundation::core::Affine;
use crate::foundation::error::{TilePaintError, TilePaintResult};

/// `base` with `local` applied first (`base * local`).
#[inline]
pub fn concatenate(base: Affine, local: Affine) -> Affine {
    base * local
}

/// `base` with `outer` applied afterwards (`outer * base`).
#[inline]
pub fn pre_concatenate(base: Affine, outer: Affine) -> Affine {
    outer * base
}

/// The neutral element of concatenation.
#[inline]
pub fn identity() -> Affine {
    Affine::IDENTITY
}

/// `true` when every coefficient equals the identity's.
pub fn is_identity(a: Affine) -> bool {
    a.as_coeffs() == Affine::IDENTITY.as_coeffs()
}

/// Build a transform from `[a, b, c, d, e, f]` coefficients, rejecting non-finite values.
pub fn from_coeffs(coeffs: [f64; 6]) -> TilePaintResult<Affine> {
    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(TilePaintError::invalid_argument(format!(
            "affine coefficients must be finite, got {coeffs:?}"
        )));
    }
    Ok(Affine::new(coeffs))
}

/// Inverse of `a`, or [`TilePaintError::NonInvertible`] when the determinant is zero or not finite.
pub fn invert(a: Affine) -> TilePaintResult<Affine> {
    let det = a.determinant();
    if !det.is_finite() || det.abs() <= f64::MIN_POSITIVE {
        return Err(TilePaintError::non_invertible(format!(
            "determinant is {det} for {:?}",
            a.as_coeffs()
        )));
    }
    let inv = a.inverse();
    if !inv.is_finite() {
        return Err(TilePaintError::non_invertible(format!(
            "inverse is not finite for {:?}",
            a.as_coeffs()
        )));
    }
    Ok(inv)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
