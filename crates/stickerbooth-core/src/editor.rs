//! The editor session: one photo, its stickers, and everything needed to
//! draw and export them.
//!
//! [`Editor`] is the single entry point for hosts. It owns the sticker model,
//! the asset store, the interaction controller and the compositor, and keeps
//! the last rendered [`Frame`] together with the [`Revision`] it was rendered
//! at. Hosts poll [`Editor::needs_render`] after feeding input and call
//! [`Editor::render`] when it returns `true`.
//!
//! Raster stickers are loaded by the host: adding one registers its path as
//! pending, the host fetches [`Editor::pending_assets`] and answers each with
//! [`Editor::resolve_asset`] or [`Editor::fail_asset`].

use thiserror::Error;

use crate::assets::{AssetState, AssetStore};
use crate::catalog::StickerCatalog;
use crate::compositor::{Compositor, FontError, Frame, GlyphRenderer};
use crate::config::{CanvasConfig, ConfigError};
use crate::decode::{decode_image, is_image_mime, DecodeError};
use crate::encode::{encode_png, EncodeError};
use crate::geometry::{DisplayMapping, Point};
use crate::interaction::{Action, GestureState, InteractionController, PointerEvent};
use crate::model::StickerModel;
use crate::sticker::{StickerId, StickerPatch, StickerSource};

/// Why an export was refused.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: no photo has been uploaded")]
    NoBaseImage,

    #[error("Export not ready: {pending} image(s) still loading")]
    NotSettled { pending: usize },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Result of a photo upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Decoded and set as the base image.
    Accepted,
    /// Not an `image/*` MIME type; nothing happened.
    Ignored,
    /// An image type, but the bytes did not decode; nothing happened.
    Undecodable,
}

/// Snapshot of everything a frame depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Revision {
    pub model: u64,
    pub assets: u64,
    pub font: u64,
}

#[derive(Debug)]
pub struct Editor {
    config: CanvasConfig,
    catalog: StickerCatalog,
    model: StickerModel,
    assets: AssetStore,
    controller: InteractionController,
    compositor: Compositor,
    frame: Option<(Revision, Frame)>,
    font_generation: u64,
    uploads: u64,
    upload_key: Option<String>,
}

impl Editor {
    pub fn new(config: CanvasConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: CanvasConfig) -> Self {
        Self {
            catalog: StickerCatalog::new(config.catalog.clone()),
            model: StickerModel::new(&config),
            assets: AssetStore::new(),
            controller: InteractionController::new(&config),
            compositor: Compositor::new(&config),
            frame: None,
            font_generation: 0,
            uploads: 0,
            upload_key: None,
            config,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn catalog(&self) -> &StickerCatalog {
        &self.catalog
    }

    pub fn model(&self) -> &StickerModel {
        &self.model
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn selection(&self) -> Option<StickerId> {
        self.controller.selection()
    }

    pub fn gesture(&self) -> GestureState {
        self.controller.gesture()
    }

    pub fn mapping(&self) -> &DisplayMapping {
        self.controller.mapping()
    }

    /// Record the on-screen size of the canvas element in CSS pixels.
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.controller.set_display_size(width, height);
    }

    // --- Photo ---

    /// Decode an uploaded file and make it the base image.
    ///
    /// The previous upload, if any, is evicted from the asset store.
    pub fn upload_base_image(&mut self, mime: &str, bytes: &[u8]) -> UploadOutcome {
        if !is_image_mime(mime) {
            log::debug!("ignoring upload of type {mime:?}");
            return UploadOutcome::Ignored;
        }

        let image = match decode_image(bytes) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("upload of type {mime:?} failed to decode: {e}");
                return UploadOutcome::Undecodable;
            }
        };

        self.uploads += 1;
        let key = format!("upload-{}", self.uploads);
        log::debug!("upload {key}: {}x{}", image.width(), image.height());
        if let Some(previous) = self.upload_key.replace(key.clone()) {
            self.assets.evict(&previous);
        }
        self.assets.insert(&key, image);
        self.model.set_base_image(key);
        UploadOutcome::Accepted
    }

    // --- Stickers ---

    /// Add a sticker at the fallback position.
    pub fn add_sticker(&mut self, raw: &str) -> StickerId {
        self.place(raw, None)
    }

    /// Add the catalog entry at `index`, if it exists.
    pub fn add_catalog_sticker(&mut self, index: usize) -> Option<StickerId> {
        let raw = self.catalog.get(index)?.to_string();
        Some(self.place(&raw, None))
    }

    /// Add a sticker dropped at a display-space point.
    ///
    /// The point is mapped to canvas space, then moved up and left by the
    /// drop offset so the sticker lands roughly centered under the cursor.
    pub fn drop_sticker(&mut self, raw: &str, display: Point) -> StickerId {
        let canvas = self.controller.mapping().to_canvas(display);
        let offset = self.config.drop_offset;
        self.place(raw, Some(Point::new(canvas.x - offset, canvas.y - offset)))
    }

    fn place(&mut self, raw: &str, position: Option<Point>) -> StickerId {
        let source = StickerSource::parse(raw);
        if let Some(path) = source.asset_path() {
            if self.assets.request(path) {
                log::debug!("requesting asset {path}");
            }
        }
        self.model.add(source, position)
    }

    /// Apply a sparse update to one sticker. Unknown ids are ignored.
    pub fn update_sticker(&mut self, id: StickerId, patch: &StickerPatch) -> bool {
        self.model.update(id, patch)
    }

    /// Remove one sticker. The selection is cleared only if it was this one.
    pub fn delete_sticker(&mut self, id: StickerId) -> bool {
        let removed = self.model.delete(id).is_some();
        self.controller.forget(id);
        removed
    }

    pub fn pointer(&mut self, event: PointerEvent) -> Action {
        self.controller.pointer(&mut self.model, event)
    }

    pub fn rotate_selected(&mut self) -> Action {
        self.controller.rotate_selected(&mut self.model)
    }

    pub fn delete_selected(&mut self) -> Action {
        self.controller.delete_selected(&mut self.model)
    }

    /// Start over: no photo, no stickers, nothing selected.
    ///
    /// Sticker assets stay cached; the uploaded photo is dropped.
    pub fn reset(&mut self) {
        self.model.reset();
        self.controller.reset();
        if let Some(key) = self.upload_key.take() {
            self.assets.evict(&key);
        }
    }

    // --- Assets ---

    /// Sticker paths the host still has to load.
    pub fn pending_assets(&self) -> Vec<String> {
        self.assets.pending()
    }

    /// Deliver the bytes for a pending sticker asset.
    ///
    /// Returns `Ok(false)` when `path` is not waiting for bytes; the uploaded
    /// photo can only change through [`Editor::upload_base_image`].
    pub fn resolve_asset(&mut self, path: &str, bytes: &[u8]) -> Result<bool, DecodeError> {
        self.assets.resolve(path, bytes)
    }

    /// Report that a pending sticker asset could not be loaded.
    pub fn fail_asset(&mut self, path: &str) -> bool {
        let failed = self.assets.fail(path);
        if failed {
            log::warn!("asset {path} failed to load");
        }
        failed
    }

    /// Load the font used for glyph stickers and the placeholder label.
    pub fn set_font(&mut self, bytes: Vec<u8>) -> Result<(), FontError> {
        let font = GlyphRenderer::from_bytes(bytes)?;
        self.compositor.set_font(Some(font));
        self.font_generation += 1;
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.compositor.has_font()
    }

    // --- Rendering ---

    pub fn revision(&self) -> Revision {
        Revision {
            model: self.model.version(),
            assets: self.assets.generation(),
            font: self.font_generation,
        }
    }

    /// `true` when the cached frame is missing or out of date.
    pub fn needs_render(&self) -> bool {
        !matches!(&self.frame, Some((rev, _)) if *rev == self.revision())
    }

    /// The frame for the current revision, rendering it if needed.
    pub fn render(&mut self) -> &Frame {
        let revision = self.revision();
        if self.needs_render() {
            self.frame = None;
        }
        let (model, assets, compositor) = (&self.model, &self.assets, &mut self.compositor);
        &self
            .frame
            .get_or_insert_with(|| (revision, compositor.render(model, assets)))
            .1
    }

    // --- Export ---

    /// Whether [`Editor::export_png`] would succeed right now.
    pub fn can_export(&self) -> bool {
        self.model.base_image().is_some() && self.loading_count() == 0
    }

    /// Encode the current frame as PNG.
    pub fn export_png(&mut self) -> Result<Vec<u8>, ExportError> {
        if self.model.base_image().is_none() {
            return Err(ExportError::NoBaseImage);
        }
        let frame = self.render();
        if !frame.is_settled() {
            return Err(ExportError::NotSettled {
                pending: frame.report.deferred,
            });
        }
        Ok(encode_png(&frame.image)?)
    }

    pub fn export_filename(&self) -> &str {
        &self.config.export_filename
    }

    /// Elements of the current model whose asset is still pending.
    fn loading_count(&self) -> usize {
        let pending = |key: &str| matches!(self.assets.state(key), Some(AssetState::Pending));
        let base = self.model.base_image().map_or(0, |key| usize::from(pending(key)));
        let stickers = self
            .model
            .stickers()
            .iter()
            .filter_map(|s| s.source.asset_path())
            .filter(|path| pending(path))
            .count();
        base + stickers
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::with_config(CanvasConfig::default())
    }
}
