//! Stickerbooth WASM - WebAssembly bindings for Stickerbooth
//!
//! This crate exposes the stickerbooth-core editor to JavaScript/TypeScript.
//! The page owns the DOM (file input, drag-and-drop, the `<canvas>`), while
//! all state and pixels live on the Rust side.
//!
//! # Module Structure
//!
//! - `studio` - The `Studio` editor handle
//! - `types` - WASM-compatible wrapper for rendered frames
//! - `encode` - Standalone PNG encoding
//!
//! # Usage
//!
//! ```typescript
//! import init, { Studio } from '@stickerbooth/wasm';
//!
//! await init();
//! const studio = new Studio();
//! studio.set_display_size(canvas.clientWidth, canvas.clientHeight);
//!
//! studio.upload(file.type, new Uint8Array(await file.arrayBuffer()));
//! studio.add_sticker('/hat1.png');
//! for (const path of studio.pending_assets()) {
//!   const res = await fetch(path);
//!   res.ok
//!     ? studio.resolve_asset(path, new Uint8Array(await res.arrayBuffer()))
//!     : studio.fail_asset(path);
//! }
//!
//! if (studio.needs_render()) {
//!   const frame = studio.render();
//!   ctx.putImageData(new ImageData(new Uint8ClampedArray(frame.pixels()), frame.width), 0, 0);
//! }
//! ```

use wasm_bindgen::prelude::*;

mod encode;
mod studio;
mod types;

pub use encode::encode_png;
pub use studio::Studio;
pub use types::JsFrame;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console")]
    {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Debug).is_err() {
            web_sys::console::warn_1(&JsValue::from_str("stickerbooth: logger already installed"));
        }
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert any displayable error into a JS string value.
pub(crate) fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
