/// Convenience result type used across tilepaint.
pub type TilePaintResult<T> = Result<T, TilePaintError>;

/// Top-level error taxonomy used by paint and surface APIs.
#[derive(thiserror::Error, Debug)]
pub enum TilePaintError {
    /// Malformed construction input (degenerate anchor, empty image, zero-sized surface).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A transform that cannot be inverted was supplied where sampling needs its inverse.
    #[error("non-invertible transform: {0}")]
    NonInvertible(String),

    /// Invalid job description or option values.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TilePaintError {
    /// Build a [`TilePaintError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`TilePaintError::NonInvertible`] value.
    pub fn non_invertible(msg: impl Into<String>) -> Self {
        Self::NonInvertible(msg.into())
    }

    /// Build a [`TilePaintError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`TilePaintError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
