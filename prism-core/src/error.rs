//! Error types for view setup and scene configuration.

use thiserror::Error;

/// Rejected inputs to [`crate::Rotator::set_view`] and [`crate::Frame::look_from`].
///
/// These describe views with no defined orientation. Avoiding them is the
/// caller's responsibility; the rotator never substitutes a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("view direction must not be the zero vector")]
    ZeroDirection,
    #[error("view up vector must not be the zero vector")]
    ZeroUp,
    #[error("view up vector is parallel to the view direction")]
    ParallelUp,
    #[error("view vectors must have finite components")]
    NonFinite,
}

/// Failures while loading or validating a [`crate::SceneConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("invalid standard view: {0}")]
    View(#[from] ViewError),
}
