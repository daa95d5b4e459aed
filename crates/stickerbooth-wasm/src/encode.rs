//! Image encoding WASM bindings.
//!
//! The editor exports through [`crate::Studio::export_png`]; this standalone
//! encoder is for hosts that composite extra layers on their own canvas and
//! still want the same PNG settings.

use stickerbooth_core::encode;
use wasm_bindgen::prelude::*;

use crate::to_js_error;

/// Encode straight-alpha RGBA pixel data to PNG bytes.
///
/// # Errors
///
/// Returns an error if:
/// - The pixel data length doesn't match width * height * 4
/// - Width or height is zero
///
/// # Example
///
/// ```typescript
/// const data = ctx.getImageData(0, 0, 600, 600);
/// const png = encode_png(new Uint8Array(data.data.buffer), 600, 600);
/// ```
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png_raw(pixels, width, height).map_err(to_js_error)
}
