//! Pointer interaction: selection, drag, resize, rotate and delete.
//!
//! Pointer events arrive in display coordinates and are mapped into canvas
//! space before any comparison, except for handle hit boxes which are sized
//! in display pixels so they stay finger-sized at any zoom.
//!
//! Hit-testing ignores rotation: a rotated sticker is grabbed through its
//! unrotated bounding box, and its handles sit on that box.

mod controller;
mod handle;
mod pointer;

pub use controller::{Action, GestureState, InteractionController};
pub use handle::{Handle, UnknownHandle};
pub use pointer::{PointerEvent, PointerPhase};
