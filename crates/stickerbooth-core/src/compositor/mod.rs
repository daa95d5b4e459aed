//! Canvas compositor.
//!
//! Paints the base image and every sticker, in model order, onto a square
//! RGBA surface of the configured logical size. Each call repaints from
//! scratch, so the output depends only on the model, the asset store, the
//! loaded font and the configuration.
//!
//! # Pipeline
//!
//! 1. No base image: fill with the placeholder color, draw the label, stop.
//! 2. Base image: letterbox-fit into the canvas (transparent bars).
//! 3. Stickers: each one drawn about its own center with its own rotation.
//!
//! Assets that are still loading are skipped and counted as deferred in the
//! [`RenderReport`]; a frame is only exportable once nothing is deferred.

mod blit;
mod glyph;
mod placement;

pub use blit::draw_transformed;
pub use glyph::{FontError, GlyphRenderer, RasterizedText, TextSprite, VerticalAnchor};
pub use placement::{fit_centered, fit_centered_pixels, Placement};

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::assets::{AssetState, AssetStore};
use crate::config::{CanvasConfig, Color};
use crate::geometry::{Point, Rect};
use crate::model::StickerModel;
use crate::sticker::{StickerInstance, StickerSource};

/// Sources more than this many times larger than their target are
/// downsampled with a proper filter before the bilinear blit.
const PRESCALE_RATIO: f64 = 2.0;

/// Largest glyph sprite, as a multiple of the canvas size.
const GLYPH_RASTER_RATIO: f64 = 2.0;

/// What happened to each element during one render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Elements painted (base image and stickers).
    pub drawn: usize,
    /// Elements whose asset is still loading.
    pub deferred: usize,
    /// Elements whose asset failed or was never requested.
    pub failed: usize,
    /// Characters of glyph stickers that could not be drawn.
    pub skipped_glyphs: usize,
}

impl RenderReport {
    /// `true` once no element is waiting on an asset.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.deferred == 0
    }
}

/// A rendered surface plus its report.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbaImage,
    pub report: RenderReport,
}

impl Frame {
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.report.is_settled()
    }
}

/// The base image resized for the current canvas.
#[derive(Debug)]
struct BaseLayer {
    key: String,
    source_dims: (u32, u32),
    placement: Placement,
    image: RgbaImage,
}

#[derive(Debug)]
pub struct Compositor {
    canvas_size: u32,
    background: Color,
    label: String,
    label_color: Color,
    label_px: f32,
    glyph_color: Color,
    font: Option<GlyphRenderer>,
    base: Option<BaseLayer>,
}

impl Compositor {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            canvas_size: config.canvas_size,
            background: config.placeholder_background,
            label: config.placeholder_label.clone(),
            label_color: config.placeholder_text_color,
            label_px: config.placeholder_font_px,
            glyph_color: config.glyph_color,
            font: None,
            base: None,
        }
    }

    pub fn set_font(&mut self, font: Option<GlyphRenderer>) {
        self.font = font;
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    /// Paint a full frame.
    pub fn render(&mut self, model: &StickerModel, assets: &AssetStore) -> Frame {
        let size = self.canvas_size;
        let mut report = RenderReport::default();

        let Some(base_key) = model.base_image() else {
            let mut image = RgbaImage::from_pixel(size, size, self.background.to_rgba());
            self.draw_placeholder_label(&mut image, &mut report);
            log::trace!("rendered placeholder: {report:?}");
            return Frame { image, report };
        };

        let mut image = RgbaImage::new(size, size);

        match assets.state(base_key) {
            Some(AssetState::Ready(source)) => {
                let layer = self.base_layer(base_key, source);
                imageops::overlay(&mut image, &layer.image, layer.placement.x, layer.placement.y);
                report.drawn += 1;
            }
            Some(AssetState::Pending) => report.deferred += 1,
            Some(AssetState::Failed) | None => report.failed += 1,
        }

        for sticker in model.stickers() {
            self.draw_sticker(&mut image, sticker, assets, &mut report);
        }

        log::trace!("rendered frame: {report:?}");
        Frame { image, report }
    }

    fn base_layer(&mut self, key: &str, source: &RgbaImage) -> &BaseLayer {
        let dims = source.dimensions();
        if !matches!(&self.base, Some(layer) if layer.key == key && layer.source_dims == dims) {
            self.base = None;
        }
        let canvas_size = self.canvas_size;
        self.base.get_or_insert_with(|| {
            let placement = fit_centered_pixels(dims.0, dims.1, canvas_size);
            let image = if (placement.width, placement.height) == dims {
                source.clone()
            } else {
                imageops::resize(source, placement.width, placement.height, FilterType::Triangle)
            };
            log::debug!(
                "base image {key} {}x{} placed at ({}, {}) as {}x{}",
                dims.0,
                dims.1,
                placement.x,
                placement.y,
                placement.width,
                placement.height
            );
            BaseLayer {
                key: key.to_string(),
                source_dims: dims,
                placement,
                image,
            }
        })
    }

    fn draw_sticker(
        &self,
        surface: &mut RgbaImage,
        sticker: &StickerInstance,
        assets: &AssetStore,
        report: &mut RenderReport,
    ) {
        let local = Rect::new(
            -sticker.width / 2.0,
            -sticker.height / 2.0,
            sticker.width,
            sticker.height,
        );
        let center = sticker.center();

        match &sticker.source {
            StickerSource::Image { path } => match assets.state(path) {
                Some(AssetState::Ready(source)) => {
                    let prescaled = prescale(source, sticker.width, sticker.height);
                    let source = prescaled.as_ref().unwrap_or(&**source);
                    draw_transformed(surface, source, local, center, sticker.rotation);
                    report.drawn += 1;
                }
                Some(AssetState::Pending) => report.deferred += 1,
                Some(AssetState::Failed) | None => report.failed += 1,
            },
            StickerSource::Glyph { text } => {
                let Some(font) = &self.font else {
                    report.skipped_glyphs += text.chars().count();
                    return;
                };
                // Rasterize no larger than what can cover the canvas and let
                // the blit scale the sprite up; the blit clips to the surface.
                let limit = f64::from(self.canvas_size) * GLYPH_RASTER_RATIO;
                let unit = f64::from(font.unit_extent(text));
                let raster_px = if unit * sticker.height > limit {
                    limit / unit
                } else {
                    sticker.height
                };
                let out = font.rasterize(text, raster_px as f32, self.glyph_color, VerticalAnchor::Middle);
                report.skipped_glyphs += out.missing_glyphs;
                if let Some(sprite) = out.sprite {
                    let scale = sticker.height / raster_px;
                    draw_sprite(surface, &sprite, center, sticker.rotation, scale);
                    report.drawn += 1;
                }
            }
        }
    }

    fn draw_placeholder_label(&self, surface: &mut RgbaImage, report: &mut RenderReport) {
        let Some(font) = &self.font else {
            return;
        };
        let out = font.rasterize(&self.label, self.label_px, self.label_color, VerticalAnchor::Alphabetic);
        report.skipped_glyphs += out.missing_glyphs;
        if let Some(sprite) = out.sprite {
            let half = f64::from(self.canvas_size) / 2.0;
            draw_sprite(surface, &sprite, Point::new(half, half), 0.0, 1.0);
        }
    }
}

/// Draw a text sprite whose offsets are relative to `anchor`, enlarged by
/// `scale`.
fn draw_sprite(surface: &mut RgbaImage, sprite: &TextSprite, anchor: Point, rotation: f64, scale: f64) {
    let local = Rect::new(
        sprite.left * scale,
        sprite.top * scale,
        f64::from(sprite.image.width()) * scale,
        f64::from(sprite.image.height()) * scale,
    );
    draw_transformed(surface, &sprite.image, local, anchor, rotation);
}

/// Downsample `source` toward `width × height` when it is much larger.
fn prescale(source: &RgbaImage, width: f64, height: f64) -> Option<RgbaImage> {
    let target_w = width.ceil().max(1.0);
    let target_h = height.ceil().max(1.0);
    let too_big = f64::from(source.width()) > target_w * PRESCALE_RATIO
        || f64::from(source.height()) > target_h * PRESCALE_RATIO;
    if !too_big {
        return None;
    }
    let w = (target_w as u32).min(source.width()).max(1);
    let h = (target_h as u32).min(source.height()).max(1);
    Some(imageops::resize(source, w, h, FilterType::Triangle))
}
