//! The `Studio` editor handle.
//!
//! A thin wrapper over [`stickerbooth_core::Editor`]: JavaScript passes
//! numbers, strings and byte arrays; sticker ids travel as their
//! `sticker-<n>` string form.

use stickerbooth_core::{
    Action, CanvasConfig, ConfigError, Editor, Handle, Point, PointerEvent, StickerId, StickerPatch,
    UploadOutcome,
};
use wasm_bindgen::prelude::*;

use crate::to_js_error;
use crate::types::JsFrame;

#[wasm_bindgen]
pub struct Studio {
    editor: Editor,
}

#[wasm_bindgen]
impl Studio {
    /// Create an editor. `config` is an optional object whose fields
    /// override the defaults (`canvas_size`, `min_sticker_size`, ...).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Studio, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            CanvasConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?
        };
        Studio::from_config(config).map_err(to_js_error)
    }

    /// The on-screen size of the canvas element, in CSS pixels.
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.editor.set_display_size(width, height);
    }

    // --- Pointer input ---

    pub fn pointer_down(&mut self, x: f64, y: f64) -> String {
        action_tag(self.editor.pointer(PointerEvent::down(x, y)))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> String {
        action_tag(self.editor.pointer(PointerEvent::moved(x, y)))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> String {
        action_tag(self.editor.pointer(PointerEvent::up(x, y)))
    }

    pub fn pointer_cancel(&mut self) -> String {
        action_tag(self.editor.pointer(PointerEvent::cancel()))
    }

    /// Tag of the selected sticker's handle under a display point, for
    /// choosing a resize cursor.
    pub fn handle_at(&self, x: f64, y: f64) -> Option<String> {
        let sticker = self.editor.selection().and_then(|id| self.editor.model().get(id))?;
        Handle::at(
            sticker.rect(),
            Point::new(x, y),
            self.editor.mapping(),
            self.editor.config().handle_radius_px,
        )
        .map(|h| h.tag().to_string())
    }

    // --- Stickers ---

    pub fn add_sticker(&mut self, source: &str) -> String {
        self.editor.add_sticker(source).to_string()
    }

    pub fn add_catalog_sticker(&mut self, index: usize) -> Option<String> {
        self.editor.add_catalog_sticker(index).map(|id| id.to_string())
    }

    /// Add a sticker dropped at display coordinates.
    pub fn drop_sticker(&mut self, source: &str, x: f64, y: f64) -> String {
        self.editor.drop_sticker(source, Point::new(x, y)).to_string()
    }

    /// Merge `{ x?, y?, width?, height?, rotation? }` into a sticker.
    pub fn update_sticker(&mut self, id: &str, patch: JsValue) -> Result<bool, JsValue> {
        let patch: StickerPatch = serde_wasm_bindgen::from_value(patch).map_err(to_js_error)?;
        Ok(parse_id(id).is_some_and(|id| self.editor.update_sticker(id, &patch)))
    }

    pub fn delete_sticker(&mut self, id: &str) -> bool {
        parse_id(id).is_some_and(|id| self.editor.delete_sticker(id))
    }

    pub fn rotate_selected(&mut self) -> bool {
        self.editor.rotate_selected() != Action::None
    }

    pub fn delete_selected(&mut self) -> bool {
        matches!(self.editor.delete_selected(), Action::Deleted(_))
    }

    pub fn reset(&mut self) {
        self.editor.reset();
    }

    /// Placed stickers in paint order, as plain objects.
    pub fn stickers(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.editor.model().stickers()).map_err(to_js_error)
    }

    pub fn selection(&self) -> Option<String> {
        self.editor.selection().map(|id| id.to_string())
    }

    pub fn catalog(&self) -> js_sys::Array {
        self.editor
            .catalog()
            .entries()
            .iter()
            .map(|entry| JsValue::from_str(entry))
            .collect()
    }

    // --- Photo and assets ---

    /// Returns `"accepted"`, `"ignored"` (not an image type) or
    /// `"undecodable"`.
    pub fn upload(&mut self, mime: &str, bytes: &[u8]) -> String {
        upload_tag(self.editor.upload_base_image(mime, bytes)).to_string()
    }

    pub fn pending_assets(&self) -> js_sys::Array {
        self.editor
            .pending_assets()
            .iter()
            .map(|path| JsValue::from_str(path))
            .collect()
    }

    /// Deliver bytes for a pending path. `false` when the path was not
    /// waiting for a load.
    pub fn resolve_asset(&mut self, path: &str, bytes: &[u8]) -> Result<bool, JsValue> {
        self.editor.resolve_asset(path, bytes).map_err(to_js_error)
    }

    pub fn fail_asset(&mut self, path: &str) -> bool {
        self.editor.fail_asset(path)
    }

    /// Font for emoji/text stickers and the placeholder label.
    pub fn set_font(&mut self, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.editor.set_font(bytes).map_err(to_js_error)
    }

    // --- Rendering and export ---

    pub fn needs_render(&self) -> bool {
        self.editor.needs_render()
    }

    pub fn render(&mut self) -> JsFrame {
        JsFrame::from_frame(self.editor.render())
    }

    #[wasm_bindgen(getter)]
    pub fn can_export(&self) -> bool {
        self.editor.can_export()
    }

    pub fn export_png(&mut self) -> Result<Vec<u8>, JsValue> {
        self.editor.export_png().map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn export_filename(&self) -> String {
        self.editor.export_filename().to_string()
    }
}

impl Studio {
    pub fn from_config(config: CanvasConfig) -> Result<Studio, ConfigError> {
        Ok(Studio {
            editor: Editor::new(config)?,
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }
}

fn parse_id(id: &str) -> Option<StickerId> {
    id.parse().ok()
}

fn action_tag(action: Action) -> String {
    let tag = match action {
        Action::None => "none",
        Action::Selected(_) => "selected",
        Action::SelectionCleared => "selection-cleared",
        Action::ResizeStarted { .. } => "resize-started",
        Action::Moved(_) => "moved",
        Action::Resized(_) => "resized",
        Action::Rotated(_) => "rotated",
        Action::Deleted(_) => "deleted",
    };
    tag.to_string()
}

fn upload_tag(outcome: UploadOutcome) -> &'static str {
    match outcome {
        UploadOutcome::Accepted => "accepted",
        UploadOutcome::Ignored => "ignored",
        UploadOutcome::Undecodable => "undecodable",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickerbooth_core::encode::encode_png_raw;

    fn studio() -> Studio {
        Studio::from_config(CanvasConfig::default()).unwrap()
    }

    fn photo() -> Vec<u8> {
        encode_png_raw(&[90u8; 4 * 4 * 4], 4, 4).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = CanvasConfig {
            canvas_size: 0,
            ..CanvasConfig::default()
        };
        assert!(Studio::from_config(config).is_err());
    }

    #[test]
    fn test_pointer_flow_reports_actions() {
        let mut s = studio();
        let id = s.add_sticker("🎩");
        assert_eq!(id, "sticker-1");

        assert_eq!(s.pointer_down(110.0, 110.0), "selected");
        assert_eq!(s.selection().as_deref(), Some("sticker-1"));
        assert_eq!(s.pointer_move(150.0, 110.0), "moved");
        assert_eq!(s.pointer_up(150.0, 110.0), "none");
        assert_eq!(s.handle_at(220.0, 180.0).as_deref(), Some("se"));
        assert_eq!(s.handle_at(300.0, 300.0), None);
        assert_eq!(s.pointer_down(500.0, 500.0), "selection-cleared");
        assert_eq!(s.handle_at(220.0, 180.0), None);
    }

    #[test]
    fn test_rotate_and_delete_selected() {
        let mut s = studio();
        assert!(!s.rotate_selected());
        s.add_sticker("⭐");
        s.pointer_down(110.0, 110.0);
        assert!(s.rotate_selected());
        assert_eq!(s.editor().model().stickers()[0].rotation, 45.0);
        assert!(s.delete_selected());
        assert!(!s.delete_selected());
        assert!(s.editor().model().is_empty());
    }

    #[test]
    fn test_delete_by_string_id() {
        let mut s = studio();
        let id = s.add_sticker("⭐");
        assert!(!s.delete_sticker("sticker-99"));
        assert!(!s.delete_sticker("garbage"));
        assert!(s.delete_sticker(&id));
    }

    #[test]
    fn test_drop_and_catalog() {
        let mut s = studio();
        s.set_display_size(300.0, 300.0);
        s.drop_sticker("😎", 100.0, 100.0);
        let placed = &s.editor().model().stickers()[0];
        assert_eq!((placed.x, placed.y), (175.0, 175.0));

        assert_eq!(s.add_catalog_sticker(0).as_deref(), Some("sticker-2"));
        assert_eq!(s.add_catalog_sticker(1000), None);
    }

    #[test]
    fn test_upload_tags() {
        let mut s = studio();
        assert_eq!(s.upload("text/html", b"<p>"), "ignored");
        assert_eq!(s.upload("image/png", b"garbage"), "undecodable");
        assert_eq!(s.upload("image/png", &photo()), "accepted");
    }

    #[test]
    fn test_render_and_export_cycle() {
        let mut s = studio();
        assert!(!s.can_export());
        s.upload("image/png", &photo());
        assert!(s.needs_render());
        let frame = s.render();
        assert!(frame.settled());
        assert!(!s.needs_render());
        assert!(s.can_export());
        assert_eq!(s.export_filename(), "customized-profile-pic.png");

        s.reset();
        assert!(!s.can_export());
        assert!(s.editor().model().base_image().is_none());
    }

    #[test]
    fn test_action_tags() {
        assert_eq!(action_tag(Action::None), "none");
        assert_eq!(action_tag(Action::Rotated(StickerId(1))), "rotated");
        assert_eq!(upload_tag(UploadOutcome::Ignored), "ignored");
    }
}
