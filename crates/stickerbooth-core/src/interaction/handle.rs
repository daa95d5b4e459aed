//! Resize handles around the selected sticker.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ResizeFloorPolicy;
use crate::geometry::{DisplayMapping, Point, Rect};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown resize handle {0:?}")]
pub struct UnknownHandle(pub String);

/// One of the eight resize affordances on the unrotated bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::Nw,
        Handle::N,
        Handle::Ne,
        Handle::E,
        Handle::Se,
        Handle::S,
        Handle::Sw,
        Handle::W,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Handle::N => "n",
            Handle::Ne => "ne",
            Handle::E => "e",
            Handle::Se => "se",
            Handle::S => "s",
            Handle::Sw => "sw",
            Handle::W => "w",
            Handle::Nw => "nw",
        }
    }

    #[inline]
    fn north(self) -> bool {
        matches!(self, Handle::N | Handle::Ne | Handle::Nw)
    }

    #[inline]
    fn south(self) -> bool {
        matches!(self, Handle::S | Handle::Se | Handle::Sw)
    }

    #[inline]
    fn east(self) -> bool {
        matches!(self, Handle::E | Handle::Ne | Handle::Se)
    }

    #[inline]
    fn west(self) -> bool {
        matches!(self, Handle::W | Handle::Nw | Handle::Sw)
    }

    /// Canvas position of this handle on `rect`.
    pub fn point(self, rect: Rect) -> Point {
        let x = if self.west() {
            rect.x
        } else if self.east() {
            rect.right()
        } else {
            rect.x + rect.width / 2.0
        };
        let y = if self.north() {
            rect.y
        } else if self.south() {
            rect.bottom()
        } else {
            rect.y + rect.height / 2.0
        };
        Point::new(x, y)
    }

    /// New rectangle after dragging this handle to `pointer` (canvas units).
    ///
    /// Edges named by the handle follow the pointer; the others stay put.
    /// Both dimensions are floored at `min_size`. Under
    /// [`ResizeFloorPolicy::PinOppositeEdge`] a clamped north or west edge is
    /// placed `min_size` away from the fixed edge; under
    /// [`ResizeFloorPolicy::FollowPointer`] it stays on the pointer.
    pub fn resize(self, rect: Rect, pointer: Point, min_size: f64, policy: ResizeFloorPolicy) -> Rect {
        let (right, bottom) = (rect.right(), rect.bottom());
        let mut out = rect;

        if self.west() {
            out.x = pointer.x;
            out.width = right - pointer.x;
        } else if self.east() {
            out.width = pointer.x - rect.x;
        }
        if self.north() {
            out.y = pointer.y;
            out.height = bottom - pointer.y;
        } else if self.south() {
            out.height = pointer.y - rect.y;
        }

        let clamp_width = !(out.width >= min_size);
        let clamp_height = !(out.height >= min_size);
        if clamp_width {
            out.width = min_size;
        }
        if clamp_height {
            out.height = min_size;
        }

        if policy == ResizeFloorPolicy::PinOppositeEdge {
            if clamp_width && self.west() {
                out.x = right - min_size;
            }
            if clamp_height && self.north() {
                out.y = bottom - min_size;
            }
        }
        out
    }

    /// The handle of `rect` under a display-space pointer, if any.
    ///
    /// Each handle owns a square of `radius` display pixels around its point.
    /// When boxes overlap (small stickers) the nearest handle wins.
    pub fn at(rect: Rect, display: Point, mapping: &DisplayMapping, radius: f64) -> Option<Handle> {
        Handle::ALL
            .iter()
            .filter_map(|&handle| {
                let p = mapping.to_display(handle.point(rect));
                let (dx, dy) = ((display.x - p.x).abs(), (display.y - p.y).abs());
                (dx <= radius && dy <= radius).then_some((handle, dx * dx + dy * dy))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Handle {
    type Err = UnknownHandle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Handle::ALL
            .into_iter()
            .find(|h| h.tag() == s)
            .ok_or_else(|| UnknownHandle(s.to_string()))
    }
}
