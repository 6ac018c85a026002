//! # Obscura Common
//!
//! Shared types and utilities used across Obscura components.
//!
//! ## Modules
//! - `color` - Hex/RGB color specifications and their resolution
//! - `types` - Shape kinds and shape palettes
//! - `error` - Common error type
//! - `constants` - Default dimensions, colors, and layout tuning

pub mod color;
pub mod constants;
pub mod error;
pub mod types;

pub use color::{ColorSpec, Rgb8};
pub use error::CaptchaError;
pub use types::*;
