//! Letterbox placement of the base photo.

use crate::geometry::Rect;

/// Integer pixel placement of a scaled image on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Scale `natural_width × natural_height` to fit inside a square of
/// `canvas_size`, preserving aspect ratio, and center it.
///
/// Scale factor is `min(canvas / w, canvas / h)`, so small images are scaled
/// up as well as large ones down.
pub fn fit_centered(natural_width: u32, natural_height: u32, canvas_size: u32) -> Rect {
    if natural_width == 0 || natural_height == 0 {
        return Rect::default();
    }
    let canvas = f64::from(canvas_size);
    let (w, h) = (f64::from(natural_width), f64::from(natural_height));
    let scale = (canvas / w).min(canvas / h);
    let (scaled_w, scaled_h) = (w * scale, h * scale);
    Rect::new(
        (canvas - scaled_w) / 2.0,
        (canvas - scaled_h) / 2.0,
        scaled_w,
        scaled_h,
    )
}

/// [`fit_centered`] snapped to whole pixels.
pub fn fit_centered_pixels(natural_width: u32, natural_height: u32, canvas_size: u32) -> Placement {
    let rect = fit_centered(natural_width, natural_height, canvas_size);
    let width = (rect.width.round() as u32).clamp(1, canvas_size.max(1));
    let height = (rect.height.round() as u32).clamp(1, canvas_size.max(1));
    Placement {
        x: (i64::from(canvas_size) - i64::from(width)) / 2,
        y: (i64::from(canvas_size) - i64::from(height)) / 2,
        width,
        height,
    }
}
