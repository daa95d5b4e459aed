//! Decoding of uploaded photos and sticker assets.
//!
//! Everything decodes to straight-alpha RGBA so the compositor handles photos
//! and transparent sticker PNGs the same way. JPEG uploads from phones carry
//! their rotation in EXIF; it is applied here so the photo appears upright.

mod orientation;
mod raster;

pub use orientation::{get_orientation, Orientation};
pub use raster::{decode_image, is_image_mime, DecodeError};
