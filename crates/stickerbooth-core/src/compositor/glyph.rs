//! Text rasterization for glyph stickers and the placeholder label.
//!
//! The host supplies a font file once per session. Text is laid out on a
//! single line with kerning, centered horizontally on an anchor point, and
//! rasterized into a straight-alpha sprite that the compositor then draws
//! through the same transformed blit as raster stickers.
//!
//! Font sizes are em sizes, as in CSS: `16px` means the em square is 16
//! pixels tall, which is not the same as `ab_glyph`'s `PxScale` (the
//! ascent-to-descent height).

use ab_glyph::{point, Font, FontArc, GlyphId, OutlinedGlyph, PxScale, PxScaleFont, ScaleFont};
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::config::Color;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("Invalid font data: {0}")]
    Invalid(String),
}

/// Where the anchor point sits vertically relative to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    /// Halfway between ascent and descent.
    Middle,
    /// On the alphabetic baseline.
    Alphabetic,
}

/// Rasterized text plus the offset of its top-left corner from the anchor.
#[derive(Debug, Clone)]
pub struct TextSprite {
    pub image: RgbaImage,
    pub left: f64,
    pub top: f64,
}

/// Result of rasterizing one string.
#[derive(Debug, Clone)]
pub struct RasterizedText {
    /// `None` when nothing in the string had a drawable outline.
    pub sprite: Option<TextSprite>,
    /// Characters the font has no glyph for.
    pub missing_glyphs: usize,
}

/// A loaded font.
#[derive(Clone)]
pub struct GlyphRenderer {
    font: FontArc,
}

impl std::fmt::Debug for GlyphRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRenderer")
            .field("glyph_count", &self.font.glyph_count())
            .finish()
    }
}

impl GlyphRenderer {
    /// Parse a TrueType/OpenType font.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| FontError::Invalid(e.to_string()))?;
        Ok(Self { font })
    }

    /// Convert an em size in pixels to the font's `PxScale`.
    pub fn em_scale(&self, px: f32) -> PxScale {
        match self.font.units_per_em() {
            Some(upem) if upem > 0.0 => PxScale::from(px * self.font.height_unscaled() / upem),
            _ => PxScale::from(px),
        }
    }

    /// Size of the laid-out `text` at a 1px em: the larger of its advance
    /// width and the font's line height. Both scale linearly with the em
    /// size, so callers can bound a rasterization before doing it.
    pub fn unit_extent(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.em_scale(1.0));
        let (_, _, advance) = self.layout(text, &scaled);
        advance.max(scaled.height())
    }

    /// Lay out and rasterize `text` at `px` em size in `color`.
    pub fn rasterize(&self, text: &str, px: f32, color: Color, anchor: VerticalAnchor) -> RasterizedText {
        let scale = self.em_scale(px);
        let scaled = self.font.as_scaled(scale);

        let baseline = match anchor {
            VerticalAnchor::Middle => (scaled.ascent() + scaled.descent()) / 2.0,
            VerticalAnchor::Alphabetic => 0.0,
        };

        let (placed, missing_glyphs, advance) = self.layout(text, &scaled);
        let shift = -advance / 2.0;
        let outlines: Vec<OutlinedGlyph> = placed
            .into_iter()
            .filter_map(|(id, x)| {
                self.font
                    .outline_glyph(id.with_scale_and_position(scale, point(x + shift, baseline)))
            })
            .collect();

        RasterizedText {
            sprite: paint(&outlines, color),
            missing_glyphs,
        }
    }

    /// Pen positions relative to a caret starting at 0, the number of
    /// characters without a glyph, and the total advance.
    fn layout(&self, text: &str, scaled: &PxScaleFont<&FontArc>) -> (Vec<(GlyphId, f32)>, usize, f32) {
        let mut placed: Vec<(GlyphId, f32)> = Vec::new();
        let mut missing_glyphs = 0;
        let mut caret = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if id.0 == 0 {
                missing_glyphs += 1;
                continue;
            }
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            placed.push((id, caret));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }
        (placed, missing_glyphs, caret)
    }
}

fn paint(outlines: &[OutlinedGlyph], color: Color) -> Option<TextSprite> {
    let first = outlines.first()?.px_bounds();
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.min.x, first.min.y, first.max.x, first.max.y);
    for g in &outlines[1..] {
        let b = g.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
    }
    let (min_x, min_y) = (min_x.floor(), min_y.floor());
    let width = (max_x.ceil() - min_x) as u32;
    let height = (max_y.ceil() - min_y) as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let [r, g, b, a] = color.0;
    let mut image = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0]));
    for glyph in outlines {
        let bounds = glyph.px_bounds();
        let ox = (bounds.min.x - min_x) as u32;
        let oy = (bounds.min.y - min_y) as u32;
        glyph.draw(|x, y, coverage| {
            let (px, py) = (ox + x, oy + y);
            if px >= width || py >= height {
                return;
            }
            let alpha = (coverage.clamp(0.0, 1.0) * a as f32).round() as u8;
            let pixel = image.get_pixel_mut(px, py);
            // Overlapping glyphs keep the stronger coverage.
            pixel.0[3] = pixel.0[3].max(alpha);
        });
    }

    Some(TextSprite {
        image,
        left: f64::from(min_x),
        top: f64::from(min_y),
    })
}
