//! CAPTCHA orchestration: configuration, build cycle, and export.
//!
//! A build allocates a fresh canvas, fills the background, draws the noise
//! shapes, then writes the phrase on top so the text stays legible. The
//! finished [`BuiltImage`] replaces whatever the builder held before.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use image::Rgb;
use obscura_common::constants::{
    DEFAULT_BACKGROUND, DEFAULT_HEIGHT, DEFAULT_SHAPE_COUNT, DEFAULT_WIDTH, MAX_SHAPE_COUNT,
};
use obscura_common::{CaptchaError, ColorSpec, Rgb8, ShapeKind, ShapePalette, ShapeStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::{Canvas, blank_canvas};
use crate::export::{self, CaptchaRecord};
use crate::font::GlyphFont;
use crate::phrase::PhraseSource;
use crate::shapes::ShapeObfuscator;
use crate::text::PhraseRenderer;

/// Validated settings for one builder, with every color already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub width: u32,
    pub height: u32,
    pub shape_count: u32,
    pub shape_kind: ShapeKind,
    /// `None` picks a random dark color per build
    pub text_color: Option<Rgb8>,
    pub background: Rgb8,
    pub shapes: Vec<ShapeStyle>,
    /// Per-glyph rotation in degrees, clockwise
    pub rotation: f32,
}

impl BuildConfig {
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::default()
    }
}

/// Collects unvalidated settings; [`BuildConfigBuilder::build`] checks them all
#[derive(Debug, Clone)]
pub struct BuildConfigBuilder {
    width: u32,
    height: u32,
    shape_count: u32,
    shape_kind: ShapeKind,
    text_color: Option<ColorSpec>,
    background: ColorSpec,
    palette: ShapePalette,
    rotation: f32,
}

impl Default for BuildConfigBuilder {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            shape_count: DEFAULT_SHAPE_COUNT,
            shape_kind: ShapeKind::default(),
            text_color: None,
            background: ColorSpec::from(DEFAULT_BACKGROUND),
            palette: ShapePalette::default(),
            rotation: 0.0,
        }
    }
}

impl BuildConfigBuilder {
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn shape_count(mut self, count: u32) -> Self {
        self.shape_count = count;
        self
    }

    pub fn shape_kind(mut self, kind: ShapeKind) -> Self {
        self.shape_kind = kind;
        self
    }

    pub fn text_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    pub fn background_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.background = color.into();
        self
    }

    pub fn palette(mut self, palette: ShapePalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Validate dimensions, shape count and rotation, then resolve every color
    pub fn build(self) -> Result<BuildConfig, CaptchaError> {
        validate_dimensions(self.width, self.height)?;
        if self.shape_count > MAX_SHAPE_COUNT {
            return Err(CaptchaError::InvalidConfig(format!(
                "shape_count must be at most {}, got {}",
                MAX_SHAPE_COUNT, self.shape_count
            )));
        }
        if !self.rotation.is_finite() {
            return Err(CaptchaError::InvalidConfig(format!(
                "rotation must be finite, got {}",
                self.rotation
            )));
        }

        Ok(BuildConfig {
            width: self.width,
            height: self.height,
            shape_count: self.shape_count,
            shape_kind: self.shape_kind,
            text_color: self.text_color.as_ref().map(ColorSpec::resolve).transpose()?,
            background: self.background.resolve()?,
            shapes: self.palette.resolve()?,
            rotation: self.rotation,
        })
    }
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), CaptchaError> {
    if width == 0 || height == 0 {
        return Err(CaptchaError::InvalidConfig(format!(
            "canvas must be at least 1x1, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

/// A finished CAPTCHA image
#[derive(Debug, Clone)]
pub struct BuiltImage {
    canvas: Canvas,
    background: Rgb<u8>,
    text_color: Rgb<u8>,
    phrase: String,
}

impl BuiltImage {
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn background(&self) -> Rgb<u8> {
        self.background
    }

    /// Color the phrase was drawn in (black for an empty phrase)
    pub fn text_color(&self) -> Rgb<u8> {
        self.text_color
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Save as a JPEG file
    pub fn save_as(&self, path: impl AsRef<Path>, quality: u8) -> Result<(), CaptchaError> {
        export::save_jpeg(&self.canvas, path.as_ref(), quality)
    }

    /// JPEG bytes
    pub fn get(&self, quality: u8) -> Result<Vec<u8>, CaptchaError> {
        export::encode_jpeg(&self.canvas, quality)
    }

    /// JPEG as a `data:` URI
    pub fn inline(&self, quality: u8) -> Result<String, CaptchaError> {
        export::inline_jpeg(&self.canvas, quality)
    }

    /// Stream JPEG bytes into `writer`
    pub fn output<W: Write>(&self, writer: &mut W, quality: u8) -> Result<(), CaptchaError> {
        export::write_jpeg(&self.canvas, writer, quality)
    }

    /// Phrase plus inline image, ready to serialize
    pub fn record(&self, quality: u8) -> Result<CaptchaRecord, CaptchaError> {
        Ok(CaptchaRecord {
            phrase: self.phrase.clone(),
            image_data: self.inline(quality)?,
            width: self.width(),
            height: self.height(),
        })
    }
}

/// Builds CAPTCHA images from a config, a font, and a phrase
///
/// Each builder owns its random source, so builders on different threads
/// share nothing mutable. The font handle is shared read-only.
pub struct CaptchaBuilder<R = StdRng> {
    config: BuildConfig,
    font: Arc<dyn GlyphFont>,
    phrase: String,
    rng: R,
    built: Option<BuiltImage>,
}

impl CaptchaBuilder<StdRng> {
    /// Builder seeded from the operating system
    pub fn new(
        config: BuildConfig,
        font: Arc<dyn GlyphFont>,
        phrase: impl Into<String>,
    ) -> Self {
        Self::with_rng(config, font, phrase, StdRng::from_os_rng())
    }

    /// Builder whose phrase is drawn from `source`
    pub fn from_source(
        config: BuildConfig,
        font: Arc<dyn GlyphFont>,
        source: &dyn PhraseSource,
    ) -> Result<Self, CaptchaError> {
        let mut rng = StdRng::from_os_rng();
        let phrase = source.next_phrase(&mut rng)?;
        Ok(Self::with_rng(config, font, phrase, rng))
    }
}

impl<R: Rng> CaptchaBuilder<R> {
    /// Builder drawing all randomness from `rng`
    pub fn with_rng(
        config: BuildConfig,
        font: Arc<dyn GlyphFont>,
        phrase: impl Into<String>,
        rng: R,
    ) -> Self {
        Self {
            config,
            font,
            phrase: phrase.into(),
            rng,
            built: None,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn set_phrase(&mut self, phrase: impl Into<String>) {
        self.phrase = phrase.into();
    }

    /// Build at the configured size
    pub fn build(&mut self) -> Result<&BuiltImage, CaptchaError> {
        self.build_sized(None, None)
    }

    /// Build, first overriding the configured width and/or height
    pub fn build_sized(
        &mut self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<&BuiltImage, CaptchaError> {
        let width = width.unwrap_or(self.config.width);
        let height = height.unwrap_or(self.config.height);
        validate_dimensions(width, height)?;
        self.config.width = width;
        self.config.height = height;

        let background = Rgb(self.config.background);
        let mut canvas = blank_canvas(width, height, background);

        let shapes = ShapeObfuscator::new(
            self.config.shape_kind,
            self.config.shape_count,
            &self.config.shapes,
        )
        .draw(&mut canvas, &mut self.rng);

        let text_color = PhraseRenderer::new(
            self.font.as_ref(),
            self.config.text_color,
            self.config.rotation,
        )
        .write_phrase(&mut canvas, &self.phrase, &mut self.rng);

        tracing::debug!(
            width = width,
            height = height,
            shapes = shapes.len(),
            glyphs = self.phrase.chars().count(),
            "Built CAPTCHA image"
        );

        Ok(&*self.built.insert(BuiltImage {
            canvas,
            background,
            text_color,
            phrase: self.phrase.clone(),
        }))
    }

    /// The most recent build, or `NotBuilt`
    pub fn built(&self) -> Result<&BuiltImage, CaptchaError> {
        self.built.as_ref().ok_or(CaptchaError::NotBuilt)
    }

    pub fn into_built(self) -> Result<BuiltImage, CaptchaError> {
        self.built.ok_or(CaptchaError::NotBuilt)
    }

    pub fn save_as(&self, path: impl AsRef<Path>, quality: u8) -> Result<(), CaptchaError> {
        self.built()?.save_as(path, quality)
    }

    pub fn get(&self, quality: u8) -> Result<Vec<u8>, CaptchaError> {
        self.built()?.get(quality)
    }

    pub fn inline(&self, quality: u8) -> Result<String, CaptchaError> {
        self.built()?.inline(quality)
    }

    pub fn output<W: Write>(&self, writer: &mut W, quality: u8) -> Result<(), CaptchaError> {
        self.built()?.output(writer, quality)
    }
}
