/// Convenience result type used across the crate.
pub type StillwallResult<T> = Result<T, StillwallError>;

/// Crate error type.
#[derive(thiserror::Error, Debug)]
pub enum StillwallError {
    /// Invalid configuration or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// The image source could not produce a usable image.
    #[error("image error: {0}")]
    Image(String),

    /// A frame buffer could not be prepared or presented.
    #[error("surface error: {0}")]
    Surface(String),

    /// Settings (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level failure (I/O, decoding).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StillwallError {
    /// Build a [`StillwallError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StillwallError::Image`].
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Build a [`StillwallError::Surface`].
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`StillwallError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
