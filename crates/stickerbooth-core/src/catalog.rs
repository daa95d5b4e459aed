//! The sticker library offered to the user.

use crate::sticker::StickerSource;

/// Asset paths shipped with the stock customizer.
pub const DEFAULT_CATALOG: &[&str] = &[
    "/aztec-chain.png",
    "/feather-hat.png",
    "/hat1.png",
    "/hat2.png",
    "/lasar-goose-right.png",
    "/cup-right.png",
    "/cup-left.png",
    "/eyeglass.png",
    "/facemask.png",
    "/facemask2.png",
    "/lasar-goose-left.png",
    "/goose-glass.png",
    "/goose-chain.png",
];

/// Fixed, ordered list of sticker sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerCatalog {
    entries: Vec<String>,
}

impl StickerCatalog {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Parsed source for the entry at `index`.
    pub fn source(&self, index: usize) -> Option<StickerSource> {
        self.get(index).map(StickerSource::parse)
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.entries.iter().any(|e| e == raw)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StickerCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG.iter().map(|s| (*s).to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_entries_are_images() {
        let catalog = StickerCatalog::default();
        assert_eq!(catalog.len(), DEFAULT_CATALOG.len());
        for i in 0..catalog.len() {
            assert!(matches!(catalog.source(i), Some(StickerSource::Image { .. })));
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = StickerCatalog::new(vec!["/a.png".to_string(), "🎩".to_string()]);
        assert_eq!(catalog.get(0), Some("/a.png"));
        assert!(matches!(catalog.source(1), Some(StickerSource::Glyph { .. })));
        assert!(catalog.get(2).is_none());
        assert!(catalog.contains("🎩"));
        assert!(!catalog.contains("/b.png"));
    }
}
