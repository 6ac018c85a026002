//! JPEG export of finished canvases.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use obscura_common::CaptchaError;
use obscura_common::constants::{JPEG_DATA_URI_PREFIX, MAX_QUALITY};
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;

/// A finished CAPTCHA ready to hand to a client
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CaptchaRecord {
    /// The answer text
    pub phrase: String,
    /// `data:image/jpeg;base64,...`
    pub image_data: String,
    pub width: u32,
    pub height: u32,
}

fn check_quality(quality: u8) -> Result<(), CaptchaError> {
    if quality > MAX_QUALITY {
        return Err(CaptchaError::InvalidQuality(quality));
    }
    Ok(())
}

/// Encode `canvas` as JPEG into `writer`
pub fn write_jpeg<W: Write>(
    canvas: &Canvas,
    writer: &mut W,
    quality: u8,
) -> Result<(), CaptchaError> {
    check_quality(quality)?;

    // The encoder's scale starts at 1
    let encoder = JpegEncoder::new_with_quality(writer, quality.max(1));
    encoder
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CaptchaError::Encoding(e.to_string()))
}

/// Encode `canvas` as JPEG bytes
pub fn encode_jpeg(canvas: &Canvas, quality: u8) -> Result<Vec<u8>, CaptchaError> {
    let mut bytes = Vec::new();
    write_jpeg(canvas, &mut bytes, quality)?;
    Ok(bytes)
}

/// Write `canvas` to a JPEG file at `path`
pub fn save_jpeg(canvas: &Canvas, path: &Path, quality: u8) -> Result<(), CaptchaError> {
    check_quality(quality)?;

    let mut writer = BufWriter::new(File::create(path)?);
    write_jpeg(canvas, &mut writer, quality)?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), quality = quality, "Saved CAPTCHA image");
    Ok(())
}

/// Encode `canvas` as an inline `data:` URI
pub fn inline_jpeg(canvas: &Canvas, quality: u8) -> Result<String, CaptchaError> {
    let bytes = encode_jpeg(canvas, quality)?;
    Ok(format!("{}{}", JPEG_DATA_URI_PREFIX, STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::blank_canvas;
    use image::Rgb;

    #[test]
    fn test_encode_jpeg_header() {
        let canvas = blank_canvas(16, 8, Rgb([200, 10, 10]));
        let bytes = encode_jpeg(&canvas, 90).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_quality_bounds() {
        let canvas = blank_canvas(4, 4, Rgb([0, 0, 0]));
        assert!(encode_jpeg(&canvas, 0).is_ok());
        assert!(encode_jpeg(&canvas, 100).is_ok());
        assert!(matches!(
            encode_jpeg(&canvas, 101),
            Err(CaptchaError::InvalidQuality(101))
        ));
    }

    #[test]
    fn test_inline_prefix() {
        let canvas = blank_canvas(4, 4, Rgb([0, 0, 0]));
        let uri = inline_jpeg(&canvas, 80).unwrap();
        let payload = uri.strip_prefix(JPEG_DATA_URI_PREFIX).unwrap();
        let bytes = STANDARD.decode(payload).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_save_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let canvas = blank_canvas(4, 4, Rgb([0, 0, 0]));
        let result = save_jpeg(&canvas, &dir.path().join("missing/out.jpg"), 90);
        assert!(matches!(result, Err(CaptchaError::Io(_))));
    }
}
