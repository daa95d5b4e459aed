//! Decoded raster assets and their load state.
//!
//! The browser loads images asynchronously; this store is where those loads
//! land. A key is requested (becoming [`AssetState::Pending`]), and the host
//! later either resolves it with encoded bytes or marks it failed. The
//! compositor only draws [`AssetState::Ready`] entries and reports pending
//! ones as deferred.
//!
//! Every state change bumps [`AssetStore::generation`] so a frame rendered
//! before a load finished is recognized as stale.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;

use crate::decode::{decode_image, DecodeError};

/// Load state of one asset.
#[derive(Debug, Clone)]
pub enum AssetState {
    /// Requested, bytes not yet delivered.
    Pending,
    /// Decoded and drawable.
    Ready(Arc<RgbaImage>),
    /// Delivery or decoding failed; the asset never draws.
    Failed,
}

impl AssetState {
    pub fn is_pending(&self) -> bool {
        matches!(self, AssetState::Pending)
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        match self {
            AssetState::Ready(img) => Some(img),
            _ => None,
        }
    }
}

/// Keyed asset cache shared by the base image and raster stickers.
#[derive(Debug, Default)]
pub struct AssetStore {
    entries: HashMap<String, AssetState>,
    generation: u64,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `key`. Returns `true` when the host needs to
    /// start a load (the key was unknown).
    pub fn request(&mut self, key: &str) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_string(), AssetState::Pending);
        self.generation += 1;
        true
    }

    /// Decode `bytes` for a pending `key` and store the result.
    ///
    /// Keys that were never requested, or that already settled, are left
    /// alone and `Ok(false)` is returned. A decode failure marks the key as
    /// failed and is returned to the caller.
    pub fn resolve(&mut self, key: &str, bytes: &[u8]) -> Result<bool, DecodeError> {
        if !self.is_pending(key) {
            log::debug!("ignoring bytes for {key}: not pending");
            return Ok(false);
        }
        match decode_image(bytes) {
            Ok(img) => {
                self.insert(key, img);
                Ok(true)
            }
            Err(e) => {
                log::warn!("asset {key} failed to decode: {e}");
                self.mark_failed(key);
                Err(e)
            }
        }
    }

    /// Store an already decoded image under `key`.
    pub fn insert(&mut self, key: &str, image: RgbaImage) {
        self.entries
            .insert(key.to_string(), AssetState::Ready(Arc::new(image)));
        self.generation += 1;
    }

    /// Mark a pending `key` as failed. It will not be requested again.
    ///
    /// Returns `false` for keys that are not pending.
    pub fn fail(&mut self, key: &str) -> bool {
        if !self.is_pending(key) {
            return false;
        }
        self.mark_failed(key);
        true
    }

    fn is_pending(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(AssetState::is_pending)
    }

    fn mark_failed(&mut self, key: &str) {
        self.entries.insert(key.to_string(), AssetState::Failed);
        self.generation += 1;
    }

    /// Forget `key` entirely.
    pub fn evict(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.generation += 1;
        }
        removed
    }

    pub fn state(&self, key: &str) -> Option<&AssetState> {
        self.entries.get(key)
    }

    pub fn image(&self, key: &str) -> Option<&RgbaImage> {
        self.entries.get(key).and_then(AssetState::image)
    }

    /// Keys still waiting for bytes, sorted for stable iteration.
    pub fn pending(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, state)| state.is_pending())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Monotonic counter of state changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_png;

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(width, height, image::Rgba([9, 9, 9, 255]))).unwrap()
    }

    #[test]
    fn test_request_marks_pending_once() {
        let mut store = AssetStore::new();
        assert!(store.request("/hat1.png"));
        assert!(!store.request("/hat1.png"));
        assert!(store.state("/hat1.png").unwrap().is_pending());
        assert_eq!(store.pending(), vec!["/hat1.png".to_string()]);
    }

    #[test]
    fn test_resolve_makes_ready() {
        let mut store = AssetStore::new();
        store.request("/hat1.png");
        assert!(store.resolve("/hat1.png", &png(4, 2)).unwrap());
        assert_eq!(store.image("/hat1.png").unwrap().dimensions(), (4, 2));
        assert!(store.pending().is_empty());
    }

    #[test]
    fn test_resolve_garbage_marks_failed() {
        let mut store = AssetStore::new();
        store.request("/broken.png");
        assert!(store.resolve("/broken.png", b"not an image").is_err());
        assert!(matches!(store.state("/broken.png"), Some(AssetState::Failed)));
        assert!(store.image("/broken.png").is_none());
        // Failed keys are not re-requested.
        assert!(!store.request("/broken.png"));
    }

    #[test]
    fn test_generation_tracks_changes() {
        let mut store = AssetStore::new();
        let g0 = store.generation();
        store.request("a");
        let g1 = store.generation();
        store.fail("a");
        let g2 = store.generation();
        store.evict("a");
        let g3 = store.generation();
        assert!(g0 < g1 && g1 < g2 && g2 < g3);

        assert!(!store.evict("a"));
        assert_eq!(store.generation(), g3);
    }

    #[test]
    fn test_only_pending_keys_settle() {
        let mut store = AssetStore::new();
        store.insert("upload-1", RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255])));
        let generation = store.generation();

        assert!(!store.resolve("upload-1", &png(4, 4)).unwrap());
        assert!(!store.fail("upload-1"));
        assert_eq!(store.image("upload-1").unwrap().dimensions(), (2, 2));

        assert!(!store.resolve("/never-requested.png", &png(4, 4)).unwrap());
        assert!(!store.fail("/never-requested.png"));
        assert!(store.state("/never-requested.png").is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.generation(), generation);

        // Settled keys stay settled.
        store.request("/hat1.png");
        assert!(store.fail("/hat1.png"));
        assert!(!store.resolve("/hat1.png", &png(4, 4)).unwrap());
        assert!(matches!(store.state("/hat1.png"), Some(AssetState::Failed)));
    }

    #[test]
    fn test_pending_is_sorted() {
        let mut store = AssetStore::new();
        store.request("/b.png");
        store.request("/a.png");
        store.request("/c.png");
        store.fail("/c.png");
        assert_eq!(store.pending(), vec!["/a.png".to_string(), "/b.png".to_string()]);
    }
}
