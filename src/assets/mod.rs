//! Texture sources: decoded files and synthetic patterns.

pub(crate) mod decode;
pub(crate) mod synth;
