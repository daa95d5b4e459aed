//! Raster decoding through the `image` crate.

use std::io::Cursor;

use image::{ImageReader, RgbaImage};
use thiserror::Error;

use super::get_orientation;

/// Errors produced while decoding an image.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not in a format we can recognize.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The format was recognized but the data is broken.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The image decoded to zero pixels.
    #[error("Image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Whether a MIME type names an image (`image/*`).
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Decode any supported format to straight-alpha RGBA, applying EXIF
/// orientation when present.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let rgba = get_orientation(bytes).apply(img).into_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty { width, height });
    }
    Ok(rgba)
}
