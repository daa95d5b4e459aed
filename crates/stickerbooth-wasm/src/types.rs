//! WASM-compatible wrapper types for rendered frames.

use stickerbooth_core::Frame;
use wasm_bindgen::prelude::*;

/// A rendered canvas frame for JavaScript.
///
/// Pixels are straight-alpha RGBA, row-major, ready for `ImageData`.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` copies it into a
/// JavaScript `Uint8Array`.
#[wasm_bindgen]
pub struct JsFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    drawn: usize,
    deferred: usize,
    failed: usize,
    skipped_glyphs: usize,
}

#[wasm_bindgen]
impl JsFrame {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Elements painted in this frame.
    #[wasm_bindgen(getter)]
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// Elements skipped because their image is still loading.
    #[wasm_bindgen(getter)]
    pub fn deferred(&self) -> usize {
        self.deferred
    }

    /// Elements whose image failed to load.
    #[wasm_bindgen(getter)]
    pub fn failed(&self) -> usize {
        self.failed
    }

    #[wasm_bindgen(getter)]
    pub fn skipped_glyphs(&self) -> usize {
        self.skipped_glyphs
    }

    /// Whether every image the frame needs has loaded.
    #[wasm_bindgen(getter)]
    pub fn settled(&self) -> bool {
        self.deferred == 0
    }
}

impl JsFrame {
    pub(crate) fn from_frame(frame: &Frame) -> Self {
        let (width, height) = frame.image.dimensions();
        Self {
            width,
            height,
            pixels: frame.image.as_raw().clone(),
            drawn: frame.report.drawn,
            deferred: frame.report.deferred,
            failed: frame.report.failed,
            skipped_glyphs: frame.report.skipped_glyphs,
        }
    }
}
