//! Font metrics and glyph drawing.
//!
//! [`GlyphFont`] is the text-rendering capability the phrase renderer relies
//! on: measure a string at a size, and draw it at a baseline position.
//! [`TtfFont`] implements it over a TrueType file with `rusttype`.

use std::path::Path;

use image::{GrayImage, Luma, Rgb};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use obscura_common::CaptchaError;
use obscura_common::constants::text::POINTS_TO_PIXELS;
use rusttype::{Font, PositionedGlyph, Scale, point};

use crate::canvas::{Canvas, blend_pixel};

/// Extents of rendered text relative to its baseline origin.
///
/// `y` grows downward, so ink above the baseline has negative `y_min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BoundingBox {
    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    /// Smallest box containing both
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// Text-rendering capability used for phrase layout and drawing
///
/// Implementations are shared read-only between concurrent builds.
pub trait GlyphFont: Send + Sync {
    /// Measure `text` at `size` (points)
    fn measure(&self, size: f32, text: &str) -> BoundingBox;

    /// Draw `text` with its baseline origin at `origin`, rotated clockwise
    /// by `angle` degrees about the center of its ink
    fn draw(
        &self,
        canvas: &mut Canvas,
        size: f32,
        angle: f32,
        origin: (i32, i32),
        color: Rgb<u8>,
        text: &str,
    );
}

/// TrueType font loaded into memory
pub struct TtfFont {
    font: Font<'static>,
    name: String,
    /// `Scale` pixels per point
    scale_per_point: f32,
}

impl TtfFont {
    /// Load a font file, failing with `MissingFontResource` if it cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CaptchaError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| CaptchaError::MissingFontResource(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(bytes, path.display().to_string())
    }

    /// Parse font data already in memory
    pub fn from_bytes(bytes: Vec<u8>, name: impl Into<String>) -> Result<Self, CaptchaError> {
        let name = name.into();
        let font = Font::try_from_vec(bytes).ok_or_else(|| {
            CaptchaError::MissingFontResource(format!("{}: not a usable TrueType font", name))
        })?;

        let scale_per_point = scale_per_point(&font);
        tracing::debug!(
            font = %name,
            glyphs = font.glyph_count(),
            scale_per_point = scale_per_point,
            "Loaded font"
        );

        Ok(Self {
            font,
            name,
            scale_per_point,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn scale(&self, size: f32) -> Scale {
        Scale::uniform(size * self.scale_per_point)
    }

    fn layout(&self, size: f32, text: &str, x: f32, y: f32) -> Vec<PositionedGlyph<'_>> {
        self.font.layout(text, self.scale(size), point(x, y)).collect()
    }
}

/// `rusttype` scales by line height (ascent - descent), so a point size has to
/// be stretched by `line height / em` for the em to come out at 96 DPI.
fn scale_per_point(font: &Font<'_>) -> f32 {
    let v_metrics = font.v_metrics_unscaled();
    let line_height = v_metrics.ascent - v_metrics.descent;
    let units_per_em = f32::from(font.units_per_em());

    if line_height > 0.0 && units_per_em > 0.0 {
        POINTS_TO_PIXELS * line_height / units_per_em
    } else {
        POINTS_TO_PIXELS
    }
}

/// Union of the pixel boxes of every glyph with ink
fn ink_bounds(glyphs: &[PositionedGlyph<'_>]) -> Option<BoundingBox> {
    glyphs
        .iter()
        .filter_map(PositionedGlyph::pixel_bounding_box)
        .map(|bb| BoundingBox {
            x_min: bb.min.x,
            y_min: bb.min.y,
            x_max: bb.max.x,
            y_max: bb.max.y,
        })
        .reduce(|acc, bb| acc.union(&bb))
}

impl GlyphFont for TtfFont {
    fn measure(&self, size: f32, text: &str) -> BoundingBox {
        let glyphs = self.layout(size, text, 0.0, 0.0);

        // Pen position after the last glyph; covers trailing whitespace
        let advance = glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
            .ceil() as i32;

        match ink_bounds(&glyphs) {
            Some(ink) => BoundingBox {
                x_min: ink.x_min.min(0),
                x_max: ink.x_max.max(advance),
                ..ink
            },
            None => {
                let v_metrics = self.font.v_metrics(self.scale(size));
                BoundingBox {
                    x_min: 0,
                    y_min: -v_metrics.ascent.ceil() as i32,
                    x_max: advance,
                    y_max: (-v_metrics.descent).ceil() as i32,
                }
            }
        }
    }

    fn draw(
        &self,
        canvas: &mut Canvas,
        size: f32,
        angle: f32,
        origin: (i32, i32),
        color: Rgb<u8>,
        text: &str,
    ) {
        let glyphs = self.layout(size, text, origin.0 as f32, origin.1 as f32);

        if angle.abs() < f32::EPSILON {
            for glyph in &glyphs {
                if let Some(bb) = glyph.pixel_bounding_box() {
                    glyph.draw(|gx, gy, v| {
                        blend_pixel(canvas, bb.min.x + gx as i32, bb.min.y + gy as i32, color, v)
                    });
                }
            }
            return;
        }

        let Some(ink) = ink_bounds(&glyphs) else {
            return;
        };

        // Square coverage mask wide enough to hold the ink at any angle
        let diagonal =
            ((ink.width().pow(2) + ink.height().pow(2)) as f32).sqrt().ceil() as i32 + 2;
        let offset_x = ink.x_min - (diagonal - ink.width()) / 2;
        let offset_y = ink.y_min - (diagonal - ink.height()) / 2;
        let mut mask = GrayImage::new(diagonal as u32, diagonal as u32);

        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let mx = bb.min.x + gx as i32 - offset_x;
                    let my = bb.min.y + gy as i32 - offset_y;
                    if mx >= 0 && my >= 0 && mx < diagonal && my < diagonal {
                        let cell = mask.get_pixel_mut(mx as u32, my as u32);
                        cell.0[0] = cell.0[0].max((v * 255.0).round() as u8);
                    }
                });
            }
        }

        let rotated = rotate_about_center(
            &mask,
            angle.to_radians(),
            Interpolation::Bilinear,
            Luma([0u8]),
        );
        for (mx, my, Luma([alpha])) in rotated.enumerate_pixels() {
            if *alpha > 0 {
                blend_pixel(
                    canvas,
                    mx as i32 + offset_x,
                    my as i32 + offset_y,
                    color,
                    *alpha as f32 / 255.0,
                );
            }
        }
    }
}
