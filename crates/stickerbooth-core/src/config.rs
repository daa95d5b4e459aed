//! Editor configuration.
//!
//! Every field has a default matching the stock profile customizer, so a host
//! only needs to pass the values it wants to override. Colors are written as
//! `#rrggbb` or `#rrggbbaa` strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::DEFAULT_CATALOG;
use crate::geometry::Point;

/// Errors produced while validating or parsing configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A color string was not `#rrggbb` or `#rrggbbaa`.
    #[error("Invalid color {0:?}: expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    /// A size-like field must be strictly positive and finite.
    #[error("Invalid {field}: {value} (must be positive)")]
    NonPositive { field: &'static str, value: f64 },

    /// The default sticker size is below the resize floor.
    #[error("Default sticker size {default} is smaller than the minimum {min}")]
    DefaultBelowMinimum { default: f64, min: f64 },
}

/// An RGBA color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba(self.0)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }

        let mut rgba = [255u8; 4];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).map_err(|_| invalid())?;
            rgba[i] = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(Self(rgba))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// What happens to the anchored edge when a resize hits the minimum size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFloorPolicy {
    /// The edge opposite the dragged handle never moves; a clamped sticker
    /// grows back toward the pointer side.
    #[default]
    PinOppositeEdge,
    /// Position follows the pointer even when the size is clamped, so the
    /// sticker can slide once the floor engages.
    FollowPointer,
}

/// Configuration for an editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Logical edge length of the square canvas.
    pub canvas_size: u32,
    /// Width and height given to a freshly added sticker.
    pub default_sticker_size: f64,
    /// Resize floor for both dimensions.
    pub min_sticker_size: f64,
    /// Top-left used when a sticker is added without a position.
    pub fallback_position: Point,
    /// Subtracted from a drop point (canvas units) on both axes.
    pub drop_offset: f64,
    /// Degrees added by one rotate action.
    pub rotate_step: f64,
    /// Half-size of a resize handle's hit box, in display pixels.
    pub handle_radius_px: f64,
    pub resize_floor: ResizeFloorPolicy,
    pub placeholder_background: Color,
    pub placeholder_text_color: Color,
    pub placeholder_label: String,
    pub placeholder_font_px: f32,
    /// Fill for glyph stickers.
    pub glyph_color: Color,
    pub export_filename: String,
    /// Sticker sources offered to the user.
    pub catalog: Vec<String>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            canvas_size: 600,
            default_sticker_size: 80.0,
            min_sticker_size: 20.0,
            fallback_position: Point::new(100.0, 100.0),
            drop_offset: 25.0,
            rotate_step: 45.0,
            handle_radius_px: 8.0,
            resize_floor: ResizeFloorPolicy::default(),
            placeholder_background: Color::rgb(0xf8, 0xfa, 0xfc),
            placeholder_text_color: Color::rgb(0x94, 0xa3, 0xb8),
            placeholder_label: "Upload a photo to get started".to_string(),
            placeholder_font_px: 16.0,
            glyph_color: Color::rgb(0, 0, 0),
            export_filename: "customized-profile-pic.png".to_string(),
            catalog: DEFAULT_CATALOG.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl CanvasConfig {
    /// Canvas edge length as a float, for geometry.
    #[inline]
    pub fn canvas_extent(&self) -> f64 {
        f64::from(self.canvas_size)
    }

    /// Check that all sizes are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("canvas_size", f64::from(self.canvas_size))?;
        positive("default_sticker_size", self.default_sticker_size)?;
        positive("min_sticker_size", self.min_sticker_size)?;
        positive("handle_radius_px", self.handle_radius_px)?;
        positive("placeholder_font_px", f64::from(self.placeholder_font_px))?;

        if self.default_sticker_size < self.min_sticker_size {
            return Err(ConfigError::DefaultBelowMinimum {
                default: self.default_sticker_size,
                min: self.min_sticker_size,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
