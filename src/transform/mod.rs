//! Shared transform helpers.

/// Affine concatenation, inversion and coefficient validation.
pub mod affine;
