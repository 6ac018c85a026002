//! Phrase layout and glyph drawing.
//!
//! The phrase is drawn glyph by glyph. One size is picked per build
//! (`width / glyphs - rand(0..=3) - 1`, never below 1), the whole phrase is
//! measured at that size and centered, then each glyph is drawn at the pen
//! position and the pen advances by that glyph's own measured width.

use image::Rgb;
use obscura_common::Rgb8;
use obscura_common::constants::text::{MIN_GLYPH_SIZE, SIZE_JITTER_MAX, TEXT_CHANNEL_MAX};
use rand::Rng;

use crate::canvas::Canvas;
use crate::font::{BoundingBox, GlyphFont};

/// Color returned when there is nothing to draw
pub const NO_TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Position of one glyph along the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub glyph: char,
    pub x: i32,
    pub advance: i32,
}

/// Resolved layout of a whole phrase
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseLayout {
    /// Glyph size in points
    pub size: f32,
    /// Box of the full phrase at `size`
    pub text_box: BoundingBox,
    /// Baseline origin of the first glyph
    pub origin: (i32, i32),
    pub glyphs: Vec<GlyphPlacement>,
}

/// Glyph size for `glyph_count` glyphs across `width`, reduced by `1 + jitter`
pub fn glyph_size(width: u32, glyph_count: usize, jitter: u32) -> f32 {
    (width as f32 / glyph_count as f32 - jitter as f32 - 1.0).max(MIN_GLYPH_SIZE)
}

/// Random dark color, each channel in `[0, 150]`
pub fn random_text_color(rng: &mut impl Rng) -> Rgb8 {
    [
        rng.random_range(0..=TEXT_CHANNEL_MAX),
        rng.random_range(0..=TEXT_CHANNEL_MAX),
        rng.random_range(0..=TEXT_CHANNEL_MAX),
    ]
}

/// Lays out and draws a phrase with a [`GlyphFont`]
pub struct PhraseRenderer<'a> {
    font: &'a dyn GlyphFont,
    text_color: Option<Rgb8>,
    rotation: f32,
}

impl<'a> PhraseRenderer<'a> {
    pub fn new(font: &'a dyn GlyphFont, text_color: Option<Rgb8>, rotation: f32) -> Self {
        Self {
            font,
            text_color,
            rotation,
        }
    }

    /// Compute glyph positions, or `None` for an empty phrase
    pub fn layout(
        &self,
        phrase: &str,
        width: u32,
        height: u32,
        rng: &mut impl Rng,
    ) -> Option<PhraseLayout> {
        let count = phrase.chars().count();
        if count == 0 {
            return None;
        }

        let jitter = rng.random_range(0..=SIZE_JITTER_MAX);
        let size = glyph_size(width, count, jitter);

        let text_box = self.font.measure(size, phrase);
        let x = (width as f32 - text_box.width() as f32) / 2.0;
        let y = (height as f32 - text_box.height() as f32) / 2.0 + size;

        let mut pen = x as i32;
        let mut buf = [0u8; 4];
        let glyphs = phrase
            .chars()
            .map(|glyph| {
                let advance = self.font.measure(size, glyph.encode_utf8(&mut buf)).width();
                let placement = GlyphPlacement { glyph, x: pen, advance };
                pen += advance;
                placement
            })
            .collect();

        Some(PhraseLayout {
            size,
            text_box,
            origin: (x as i32, y as i32),
            glyphs,
        })
    }

    /// Draw `phrase` onto `canvas` and return the text color used
    ///
    /// An empty phrase draws nothing and returns black.
    pub fn write_phrase(&self, canvas: &mut Canvas, phrase: &str, rng: &mut impl Rng) -> Rgb<u8> {
        let (width, height) = canvas.dimensions();
        let Some(layout) = self.layout(phrase, width, height, rng) else {
            return NO_TEXT_COLOR;
        };

        // One color per build, shared by every glyph
        let color = Rgb(self.text_color.unwrap_or_else(|| random_text_color(rng)));

        tracing::trace!(
            size = layout.size,
            origin = ?layout.origin,
            glyphs = layout.glyphs.len(),
            "Writing phrase"
        );

        let mut buf = [0u8; 4];
        for placement in &layout.glyphs {
            self.font.draw(
                canvas,
                layout.size,
                self.rotation,
                (placement.x, layout.origin.1),
                color,
                placement.glyph.encode_utf8(&mut buf),
            );
        }

        color
    }
}
