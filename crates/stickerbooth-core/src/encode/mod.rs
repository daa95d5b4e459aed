//! PNG export of composited frames.
//!
//! The export is always PNG so transparent letterbox bars and sticker alpha
//! survive the download. Encoding is synchronous and single-threaded.

mod png;

pub use png::{encode_png, encode_png_raw, EncodeError};
