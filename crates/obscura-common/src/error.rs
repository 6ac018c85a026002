//! Common error types for Obscura components.

use thiserror::Error;

/// Errors raised while configuring, building, or exporting a CAPTCHA
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// Hex color string is malformed
    #[error("Invalid color format: {0:?}")]
    InvalidColorFormat(String),

    /// Font reference does not resolve to a usable font
    #[error("Missing font resource: {0}")]
    MissingFontResource(String),

    /// Export attempted before the image was built
    #[error("CAPTCHA image has not been built yet")]
    NotBuilt,

    /// Image codec failure
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Phrase corpus could not be read or is empty
    #[error("Phrase source unavailable: {0}")]
    SourceUnavailable(String),

    /// Export quality outside 0..=100
    #[error("Invalid quality {0}: expected 0..=100")]
    InvalidQuality(u8),

    /// Any other rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Filesystem error during export
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptchaError {
    /// Returns true if this error is raised while configuring, before any build
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidColorFormat(_)
                | Self::MissingFontResource(_)
                | Self::InvalidQuality(_)
                | Self::InvalidConfig(_)
        )
    }

    /// Returns true if the caller may reasonably retry the operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::SourceUnavailable(_))
    }
}
