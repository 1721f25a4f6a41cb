//! CPU fill target for paints.

/// Premultiplied RGBA8 surface and rectangle fills.
pub mod surface;
