//! Test doubles shared by the unit tests.

use image::Rgb;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::canvas::Canvas;
use crate::font::{BoundingBox, GlyphFont, TtfFont};

/// DejaVu Sans Bold: 2048 units per em, `M` advances 2038 units, space 713
const DEJAVU_SANS_BOLD: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../assets/fonts/DejaVuSans-Bold.ttf"
));

pub(crate) fn dejavu_sans_bold() -> TtfFont {
    TtfFont::from_bytes(DEJAVU_SANS_BOLD.to_vec(), "DejaVuSans-Bold").unwrap()
}

/// Coverage-weighted ink: `(x, y, weight)` for every pixel darker than white
pub(crate) fn ink_pixels(canvas: &Canvas) -> Vec<(f64, f64, f64)> {
    canvas
        .enumerate_pixels()
        .filter_map(|(x, y, p)| {
            let weight = 255.0 - p.0.iter().map(|&c| f64::from(c)).sum::<f64>() / 3.0;
            (weight > 0.0).then_some((f64::from(x), f64::from(y), weight))
        })
        .collect()
}

/// Weighted centroid of `ink`
pub(crate) fn ink_centroid(ink: &[(f64, f64, f64)]) -> (f64, f64) {
    let total: f64 = ink.iter().map(|p| p.2).sum();
    let x = ink.iter().map(|p| p.0 * p.2).sum::<f64>() / total;
    let y = ink.iter().map(|p| p.1 * p.2).sum::<f64>() / total;
    (x, y)
}

/// Monospaced font drawing every non-whitespace glyph as a solid block
/// `0.6 * size` wide (less one pixel of spacing) and `size` tall above the
/// baseline. Ignores rotation.
pub(crate) struct BlockFont;

impl BlockFont {
    pub(crate) fn advance(size: f32) -> i32 {
        ((size * 0.6).round() as i32).max(1)
    }

    pub(crate) fn ascent(size: f32) -> i32 {
        (size.round() as i32).max(1)
    }
}

impl GlyphFont for BlockFont {
    fn measure(&self, size: f32, text: &str) -> BoundingBox {
        BoundingBox {
            x_min: 0,
            y_min: -Self::ascent(size),
            x_max: text.chars().count() as i32 * Self::advance(size),
            y_max: 0,
        }
    }

    fn draw(
        &self,
        canvas: &mut Canvas,
        size: f32,
        _angle: f32,
        origin: (i32, i32),
        color: Rgb<u8>,
        text: &str,
    ) {
        let advance = Self::advance(size);
        let ascent = Self::ascent(size);
        let block_width = (advance - 1).max(1) as u32;

        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let x = origin.0 + i as i32 * advance;
            let rect = Rect::at(x, origin.1 - ascent).of_size(block_width, ascent as u32);
            draw_filled_rect_mut(canvas, rect, color);
        }
    }
}
