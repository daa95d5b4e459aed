//! Stickerbooth Core - profile picture sticker editor
//!
//! This crate holds everything about the editor that does not touch the
//! browser: the sticker model, decoded assets, the compositor that paints
//! the 600×600 canvas, pointer interaction and PNG export.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`model`] | Ordered sticker instances and the base-image reference |
//! | [`assets`] | Decoded images keyed by path, with load state |
//! | [`compositor`] | Paints base image and stickers into an RGBA frame |
//! | [`interaction`] | Select, drag, resize, rotate and delete |
//! | [`editor`] | Session facade used by the bindings |
//! | [`decode`] / [`encode`] | Image decoding and PNG export |

pub mod assets;
pub mod catalog;
pub mod compositor;
pub mod config;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod geometry;
pub mod interaction;
pub mod model;
pub mod sticker;

pub use assets::{AssetState, AssetStore};
pub use catalog::{StickerCatalog, DEFAULT_CATALOG};
pub use compositor::{Compositor, FontError, Frame, RenderReport};
pub use config::{CanvasConfig, Color, ConfigError, ResizeFloorPolicy};
pub use decode::DecodeError;
pub use editor::{Editor, ExportError, Revision, UploadOutcome};
pub use encode::EncodeError;
pub use geometry::{DisplayMapping, Point, Rect};
pub use interaction::{Action, GestureState, Handle, InteractionController, PointerEvent, PointerPhase};
pub use model::StickerModel;
pub use sticker::{StickerId, StickerInstance, StickerPatch, StickerSource};
