//! The pixel grid a CAPTCHA is composed on.

use image::{Rgb, RgbImage};

/// Mutable RGB pixel grid, origin top-left
pub type Canvas = RgbImage;

/// Allocate a `width` x `height` canvas filled with `background`
pub fn blank_canvas(width: u32, height: u32, background: Rgb<u8>) -> Canvas {
    RgbImage::from_pixel(width, height, background)
}

/// Alpha-blend `color` over the pixel at (x, y); out-of-bounds writes are dropped
pub(crate) fn blend_pixel(canvas: &mut Canvas, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in pixel.0.iter_mut().zip(color.0) {
        *dst = (src as f32 * alpha + *dst as f32 * (1.0 - alpha)).round() as u8;
    }
}
