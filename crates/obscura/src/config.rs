//! Configuration management for the Obscura CLI.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use obscura::{BuildConfig, CaptchaError, ColorSpec, ShapeKind, ShapePalette};
use obscura_common::constants::{
    DEFAULT_BACKGROUND, DEFAULT_FONT_PATH, DEFAULT_HEIGHT, DEFAULT_PALETTE, DEFAULT_PHRASES_PATH,
    DEFAULT_QUALITY, DEFAULT_SHAPE_COUNT, DEFAULT_WIDTH,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// TrueType font used for the phrase
    #[serde(default = "default_font_path")]
    pub font_path: String,

    /// Phrase corpus, one phrase per line
    #[serde(default = "default_phrases_path")]
    pub phrases_path: String,

    /// Canvas width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Canvas height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Number of noise shapes
    #[serde(default = "default_shape_count")]
    pub shape_count: u32,

    /// circle, diamond, square, or star
    #[serde(default)]
    pub shape_kind: ShapeKind,

    /// Fixed text color (random dark color when unset)
    #[serde(default)]
    pub text_color: Option<ColorSpec>,

    #[serde(default = "default_background")]
    pub background_color: ColorSpec,

    /// Preset name or explicit entries
    #[serde(default)]
    pub palette: PaletteSetting,

    /// Per-glyph rotation in degrees
    #[serde(default)]
    pub rotation: f32,

    /// JPEG quality (0-100)
    #[serde(default = "default_quality")]
    pub quality: u8,
}

/// Palette as configured: `palette = "google"` or `[[palette]]` tables
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PaletteSetting {
    Named(String),
    Custom(ShapePalette),
}

impl Default for PaletteSetting {
    fn default() -> Self {
        Self::Named(DEFAULT_PALETTE.to_string())
    }
}

impl PaletteSetting {
    pub fn to_palette(&self) -> Result<ShapePalette, CaptchaError> {
        match self {
            Self::Named(name) => ShapePalette::named(name),
            Self::Custom(palette) => Ok(palette.clone()),
        }
    }
}

// Default value functions
fn default_font_path() -> String { DEFAULT_FONT_PATH.to_string() }
fn default_phrases_path() -> String { DEFAULT_PHRASES_PATH.to_string() }
fn default_width() -> u32 { DEFAULT_WIDTH }
fn default_height() -> u32 { DEFAULT_HEIGHT }
fn default_shape_count() -> u32 { DEFAULT_SHAPE_COUNT }
fn default_background() -> ColorSpec { ColorSpec::from(DEFAULT_BACKGROUND) }
fn default_quality() -> u8 { DEFAULT_QUALITY }

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!(path = config_path, "Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref font) = args.font {
            config.font_path = font.clone();
        }
        if let Some(ref phrases) = args.phrases {
            config.phrases_path = phrases.clone();
        }
        if let Some(width) = args.width {
            config.width = width;
        }
        if let Some(height) = args.height {
            config.height = height;
        }
        if let Some(shape) = args.shape {
            config.shape_kind = shape;
        }
        if let Some(quality) = args.quality {
            config.quality = quality;
        }

        Ok(config)
    }

    /// Validate and resolve into the library's build settings
    pub fn build_config(&self) -> Result<BuildConfig, CaptchaError> {
        let mut builder = BuildConfig::builder()
            .width(self.width)
            .height(self.height)
            .shape_count(self.shape_count)
            .shape_kind(self.shape_kind)
            .background_color(self.background_color.clone())
            .palette(self.palette.to_palette()?)
            .rotation(self.rotation);

        if let Some(ref color) = self.text_color {
            builder = builder.text_color(color.clone());
        }

        builder.build()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            font_path: default_font_path(),
            phrases_path: default_phrases_path(),
            width: default_width(),
            height: default_height(),
            shape_count: default_shape_count(),
            shape_kind: ShapeKind::default(),
            text_color: None,
            background_color: default_background(),
            palette: PaletteSetting::default(),
            rotation: 0.0,
            quality: default_quality(),
        }
    }
}
