//! Occluding background shapes.
//!
//! The canvas width is split into `count` equal bands (floor division) and
//! one shape is dropped into each band, so noise covers the full width
//! instead of clumping. Per shape, in order:
//! - palette entry: uniform, with replacement
//! - diameter: uniform in `[height / 5, height]`
//! - center x: uniform within the band; center y: uniform in `[-10, height]`
//!
//! A shape with a border color gets a ring: the border shape is filled at
//! `diameter + 2` first, then the fill shape at `diameter` on top.

use std::f32::consts::PI;

use image::Rgb;
use imageproc::drawing::{draw_filled_ellipse_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;
use obscura_common::constants::shapes::{BORDER_GROWTH, MIN_DIAMETER_DIVISOR, TOP_OVERHANG};
use obscura_common::{ShapeKind, ShapeStyle};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::canvas::Canvas;

/// Where and how one shape is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapePlacement {
    /// Inclusive horizontal band `[start, end]` the center was picked from
    pub band: (u32, u32),
    pub center: (i32, i32),
    pub diameter: u32,
    pub style: ShapeStyle,
}

/// Draws randomized noise shapes across a canvas
pub struct ShapeObfuscator<'a> {
    kind: ShapeKind,
    count: u32,
    styles: &'a [ShapeStyle],
}

impl<'a> ShapeObfuscator<'a> {
    pub fn new(kind: ShapeKind, count: u32, styles: &'a [ShapeStyle]) -> Self {
        Self { kind, count, styles }
    }

    /// Band bounds for the 1-based shape `index`
    pub fn band(&self, index: u32, width: u32) -> (u32, u32) {
        let band_width = width.checked_div(self.count).unwrap_or(0);
        ((index - 1) * band_width, index * band_width)
    }

    /// Pick placements for every shape without drawing anything
    pub fn plan(&self, width: u32, height: u32, rng: &mut impl Rng) -> Vec<ShapePlacement> {
        let mut placements = Vec::new();

        for index in 1..=self.count {
            let Some(style) = self.styles.choose(rng).copied() else {
                break;
            };
            let diameter = rng.random_range(height / MIN_DIAMETER_DIVISOR..=height);
            let band = self.band(index, width);
            let cx = rng.random_range(band.0..=band.1) as i32;
            let cy = rng.random_range(-TOP_OVERHANG..=height as i32);

            placements.push(ShapePlacement {
                band,
                center: (cx, cy),
                diameter,
                style,
            });
        }

        placements
    }

    /// Plan and draw all shapes onto `canvas`, returning the placements used
    pub fn draw(&self, canvas: &mut Canvas, rng: &mut impl Rng) -> Vec<ShapePlacement> {
        let (width, height) = canvas.dimensions();
        let placements = self.plan(width, height, rng);

        for placement in &placements {
            tracing::trace!(
                kind = %self.kind,
                center = ?placement.center,
                diameter = placement.diameter,
                "Drawing shape"
            );
            draw_shape(canvas, self.kind, placement);
        }

        placements
    }
}

/// Draw one placement, border ring first
pub fn draw_shape(canvas: &mut Canvas, kind: ShapeKind, placement: &ShapePlacement) {
    if let Some(border) = placement.style.border {
        fill_shape(
            canvas,
            kind,
            placement.center,
            placement.diameter + BORDER_GROWTH,
            Rgb(border),
        );
    }
    fill_shape(
        canvas,
        kind,
        placement.center,
        placement.diameter,
        Rgb(placement.style.fill),
    );
}

fn fill_shape(
    canvas: &mut Canvas,
    kind: ShapeKind,
    center: (i32, i32),
    diameter: u32,
    color: Rgb<u8>,
) {
    let radius = (diameter / 2) as i32;
    let (cx, cy) = center;

    match kind {
        ShapeKind::Circle => draw_filled_ellipse_mut(canvas, center, radius, radius, color),
        ShapeKind::Square => {
            let side = diameter.max(1);
            let rect = Rect::at(cx - radius, cy - radius).of_size(side, side);
            draw_filled_rect_mut(canvas, rect, color);
        }
        // Polygons collapse to a point below radius 1
        ShapeKind::Diamond if radius > 0 => {
            let points = [
                Point::new(cx, cy - radius),
                Point::new(cx + radius, cy),
                Point::new(cx, cy + radius),
                Point::new(cx - radius, cy),
            ];
            draw_polygon_mut(canvas, &points, color);
        }
        ShapeKind::Star if radius > 0 => {
            draw_polygon_mut(canvas, &star_points(center, radius), color)
        }
        ShapeKind::Diamond | ShapeKind::Star => {}
    }
}

/// Five-pointed star, tip up, alternating outer and inner vertices
fn star_points((cx, cy): (i32, i32), radius: i32) -> Vec<Point<i32>> {
    const INNER_RATIO: f32 = 0.4;

    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { radius as f32 } else { radius as f32 * INNER_RATIO };
            let theta = -PI / 2.0 + i as f32 * PI / 5.0;
            Point::new(
                cx + (r * theta.cos()).round() as i32,
                cy + (r * theta.sin()).round() as i32,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::blank_canvas;
    use obscura_common::ShapePalette;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn google_styles() -> Vec<ShapeStyle> {
        ShapePalette::google().resolve().unwrap()
    }

    #[test]
    fn test_band_partitioning() {
        let styles = google_styles();
        let obfuscator = ShapeObfuscator::new(ShapeKind::Circle, 8, &styles);

        for i in 1..=8 {
            assert_eq!(obfuscator.band(i, 500), ((i - 1) * 62, i * 62));
        }
    }

    #[test]
    fn test_centers_stay_in_bands() {
        let styles = google_styles();
        let obfuscator = ShapeObfuscator::new(ShapeKind::Circle, 8, &styles);

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let placements = obfuscator.plan(500, 150, &mut rng);
            assert_eq!(placements.len(), 8);

            for (i, p) in placements.iter().enumerate() {
                let i = i as u32 + 1;
                assert_eq!(p.band, ((i - 1) * 62, i * 62));
                assert!(p.center.0 >= p.band.0 as i32 && p.center.0 <= p.band.1 as i32);
                assert!((-10..=150).contains(&p.center.1));
                assert!((30..=150).contains(&p.diameter));
                assert!(styles.contains(&p.style));
            }
        }
    }

    #[test]
    fn test_zero_shapes() {
        let styles = google_styles();
        let obfuscator = ShapeObfuscator::new(ShapeKind::Circle, 0, &styles);
        let mut canvas = blank_canvas(100, 40, WHITE);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(obfuscator.draw(&mut canvas, &mut rng).is_empty());
        assert!(canvas.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_narrow_canvas_collapses_bands() {
        let styles = google_styles();
        let obfuscator = ShapeObfuscator::new(ShapeKind::Circle, 8, &styles);
        let mut rng = StdRng::seed_from_u64(3);

        let placements = obfuscator.plan(5, 150, &mut rng);
        assert!(placements.iter().all(|p| p.center.0 == 0));
    }

    #[test]
    fn test_same_seed_same_plan() {
        let styles = google_styles();
        let obfuscator = ShapeObfuscator::new(ShapeKind::Star, 8, &styles);

        let a = obfuscator.plan(500, 150, &mut StdRng::seed_from_u64(42));
        let b = obfuscator.plan(500, 150, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_border_ring_drawn_under_fill() {
        let fill = [234, 67, 53];
        let border = [245, 137, 127];
        let placement = ShapePlacement {
            band: (0, 100),
            center: (50, 50),
            diameter: 20,
            style: ShapeStyle { fill, border: Some(border) },
        };
        let mut canvas = blank_canvas(100, 100, WHITE);

        draw_shape(&mut canvas, ShapeKind::Circle, &placement);

        assert_eq!(*canvas.get_pixel(50, 50), Rgb(fill));
        assert_eq!(*canvas.get_pixel(50, 40), Rgb(fill));
        assert_eq!(*canvas.get_pixel(50, 39), Rgb(border));
        assert_eq!(*canvas.get_pixel(50, 30), WHITE);
    }

    #[test]
    fn test_every_kind_draws() {
        let style = ShapeStyle { fill: [0, 0, 255], border: None };
        for kind in ShapeKind::ALL {
            let mut canvas = blank_canvas(60, 60, WHITE);
            let placement = ShapePlacement {
                band: (0, 60),
                center: (30, 30),
                diameter: 30,
                style,
            };
            draw_shape(&mut canvas, kind, &placement);
            assert_eq!(*canvas.get_pixel(30, 30), Rgb([0, 0, 255]), "{kind}");
            assert_eq!(*canvas.get_pixel(0, 0), WHITE, "{kind}");
        }
    }

    #[test]
    fn test_clipped_shapes_do_not_panic() {
        let styles = google_styles();
        for kind in ShapeKind::ALL {
            let obfuscator = ShapeObfuscator::new(kind, 8, &styles);
            let mut canvas = blank_canvas(40, 3, WHITE);
            let mut rng = StdRng::seed_from_u64(9);
            obfuscator.draw(&mut canvas, &mut rng);
        }
    }
}
