//! Sticker instance types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Identifier of a placed sticker. Unique for the lifetime of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickerId(pub u64);

impl fmt::Display for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sticker-{}", self.0)
    }
}

impl std::str::FromStr for StickerId {
    type Err = std::num::ParseIntError;

    /// Accepts both `sticker-7` and a bare `7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("sticker-").unwrap_or(s).parse().map(StickerId)
    }
}

/// What a sticker draws.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StickerSource {
    /// A raster asset, loaded from `path`.
    Image { path: String },
    /// Literal text (typically a single emoji), drawn with the session font.
    Glyph { text: String },
}

impl StickerSource {
    /// Classify a raw source string: URLs and absolute paths are raster
    /// assets, anything else is drawn as text.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http") || raw.starts_with('/') {
            StickerSource::Image {
                path: raw.to_string(),
            }
        } else {
            StickerSource::Glyph {
                text: raw.to_string(),
            }
        }
    }

    /// The asset path for raster stickers.
    pub fn asset_path(&self) -> Option<&str> {
        match self {
            StickerSource::Image { path } => Some(path),
            StickerSource::Glyph { .. } => None,
        }
    }
}

/// One placed sticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerInstance {
    pub id: StickerId,
    pub source: StickerSource,
    /// Left edge in canvas units.
    pub x: f64,
    /// Top edge in canvas units.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees, always in `[0, 360)`.
    pub rotation: f64,
}

impl StickerInstance {
    /// Unrotated bounding box.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.rect().center()
    }
}

/// Sparse update for a sticker. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StickerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl StickerPatch {
    pub fn position(p: Point) -> Self {
        Self {
            x: Some(p.x),
            y: Some(p.y),
            ..Default::default()
        }
    }

    pub fn rect(r: Rect) -> Self {
        Self {
            x: Some(r.x),
            y: Some(r.y),
            width: Some(r.width),
            height: Some(r.height),
            rotation: None,
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Wrap an angle into `[0, 360)`.
#[inline]
pub fn normalize_rotation(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticker_id_display_and_parse() {
        let id = StickerId(42);
        assert_eq!(id.to_string(), "sticker-42");
        assert_eq!("sticker-42".parse::<StickerId>().unwrap(), id);
        assert_eq!("42".parse::<StickerId>().unwrap(), id);
        assert!("sticker-x".parse::<StickerId>().is_err());
    }

    #[test]
    fn test_source_parse_paths_are_images() {
        assert_eq!(
            StickerSource::parse("/hat1.png"),
            StickerSource::Image {
                path: "/hat1.png".to_string()
            }
        );
        assert!(matches!(
            StickerSource::parse("https://cdn.example/x.png"),
            StickerSource::Image { .. }
        ));
    }

    #[test]
    fn test_source_parse_text_is_glyph() {
        assert_eq!(
            StickerSource::parse("😎"),
            StickerSource::Glyph {
                text: "😎".to_string()
            }
        );
        assert_eq!(StickerSource::parse("😎").asset_path(), None);
    }

    #[test]
    fn test_normalize_rotation() {
        assert_eq!(normalize_rotation(0.0), 0.0);
        assert_eq!(normalize_rotation(360.0), 0.0);
        assert_eq!(normalize_rotation(405.0), 45.0);
        assert_eq!(normalize_rotation(-45.0), 315.0);
        let tiny = normalize_rotation(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_patch_constructors() {
        let p = StickerPatch::position(Point::new(1.0, 2.0));
        assert_eq!(p.x, Some(1.0));
        assert_eq!(p.width, None);
        assert!(StickerPatch::default().is_empty());
        assert!(!StickerPatch::rotation(45.0).is_empty());
    }

    #[test]
    fn test_instance_rect_and_center() {
        let s = StickerInstance {
            id: StickerId(1),
            source: StickerSource::parse("/a.png"),
            x: 100.0,
            y: 100.0,
            width: 80.0,
            height: 80.0,
            rotation: 0.0,
        };
        assert_eq!(s.rect(), Rect::new(100.0, 100.0, 80.0, 80.0));
        assert_eq!(s.center(), Point::new(140.0, 140.0));
    }
}
