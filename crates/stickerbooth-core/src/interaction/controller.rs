use crate::config::{CanvasConfig, ResizeFloorPolicy};
use crate::geometry::{DisplayMapping, Point};
use crate::model::StickerModel;
use crate::sticker::{StickerId, StickerPatch};

use super::handle::Handle;
use super::pointer::{PointerEvent, PointerPhase};

/// The gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Moving a sticker. `offset` is pointer minus top-left at grab time.
    Dragging { id: StickerId, offset: Point },
    /// Dragging one of the selected sticker's handles.
    Resizing { id: StickerId, handle: Handle },
}

/// What a controller call did, for the host to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Selected(StickerId),
    SelectionCleared,
    ResizeStarted { id: StickerId, handle: Handle },
    Moved(StickerId),
    Resized(StickerId),
    Rotated(StickerId),
    Deleted(StickerId),
}

impl Action {
    /// Whether the sticker model changed.
    pub fn mutated(&self) -> bool {
        matches!(
            self,
            Action::Moved(_) | Action::Resized(_) | Action::Rotated(_) | Action::Deleted(_)
        )
    }
}

/// Selection plus gesture state machine over a [`StickerModel`].
///
/// The controller never owns the model; each call borrows it.
#[derive(Debug, Clone)]
pub struct InteractionController {
    selection: Option<StickerId>,
    gesture: GestureState,
    mapping: DisplayMapping,
    handle_radius: f64,
    rotate_step: f64,
    resize_floor: ResizeFloorPolicy,
}

impl InteractionController {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            selection: None,
            gesture: GestureState::Idle,
            mapping: DisplayMapping::identity(config.canvas_extent()),
            handle_radius: config.handle_radius_px,
            rotate_step: config.rotate_step,
            resize_floor: config.resize_floor,
        }
    }

    pub fn selection(&self) -> Option<StickerId> {
        self.selection
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn mapping(&self) -> &DisplayMapping {
        &self.mapping
    }

    /// Record the on-screen size of the canvas element.
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        let canvas = self.mapping.canvas_size();
        self.mapping = DisplayMapping::new(canvas, width, height);
    }

    /// Feed one pointer event. Non-finite positions are ignored.
    pub fn pointer(&mut self, model: &mut StickerModel, event: PointerEvent) -> Action {
        match event.phase {
            PointerPhase::Up | PointerPhase::Cancel => {
                self.gesture = GestureState::Idle;
                Action::None
            }
            _ if !event.position.is_finite() => Action::None,
            PointerPhase::Down => self.pointer_down(model, event.position),
            PointerPhase::Move => self.pointer_move(model, event.position),
        }
    }

    fn pointer_down(&mut self, model: &StickerModel, display: Point) -> Action {
        if let Some(selected) = self.selection.and_then(|id| model.get(id)) {
            if let Some(handle) = Handle::at(selected.rect(), display, &self.mapping, self.handle_radius) {
                let id = selected.id;
                self.gesture = GestureState::Resizing { id, handle };
                return Action::ResizeStarted { id, handle };
            }
        }

        let pointer = self.mapping.to_canvas(display);
        match model.hit_test(pointer) {
            Some(sticker) => {
                self.selection = Some(sticker.id);
                self.gesture = GestureState::Dragging {
                    id: sticker.id,
                    offset: pointer - sticker.position(),
                };
                Action::Selected(sticker.id)
            }
            None => {
                self.gesture = GestureState::Idle;
                match self.selection.take() {
                    Some(_) => Action::SelectionCleared,
                    None => Action::None,
                }
            }
        }
    }

    fn pointer_move(&mut self, model: &mut StickerModel, display: Point) -> Action {
        let pointer = self.mapping.to_canvas(display);
        match self.gesture {
            GestureState::Idle => Action::None,
            GestureState::Dragging { id, offset } => {
                if model.update(id, &StickerPatch::position(pointer - offset)) {
                    Action::Moved(id)
                } else {
                    self.gesture = GestureState::Idle;
                    Action::None
                }
            }
            GestureState::Resizing { id, handle } => {
                let Some(sticker) = model.get(id) else {
                    self.gesture = GestureState::Idle;
                    return Action::None;
                };
                let rect = handle.resize(sticker.rect(), pointer, model.min_size(), self.resize_floor);
                model.update(id, &StickerPatch::rect(rect));
                Action::Resized(id)
            }
        }
    }

    /// Turn the selected sticker by the configured step.
    pub fn rotate_selected(&mut self, model: &mut StickerModel) -> Action {
        let Some(sticker) = self.selection.and_then(|id| model.get(id)) else {
            return Action::None;
        };
        let (id, rotation) = (sticker.id, sticker.rotation + self.rotate_step);
        model.update(id, &StickerPatch::rotation(rotation));
        Action::Rotated(id)
    }

    /// Remove the selected sticker and clear the selection.
    pub fn delete_selected(&mut self, model: &mut StickerModel) -> Action {
        let Some(id) = self.selection.take() else {
            return Action::None;
        };
        self.gesture = GestureState::Idle;
        match model.delete(id) {
            Some(_) => Action::Deleted(id),
            None => Action::SelectionCleared,
        }
    }

    /// Drop any reference to `id` after it was removed elsewhere.
    pub fn forget(&mut self, id: StickerId) {
        if self.selection == Some(id) {
            self.selection = None;
        }
        match self.gesture {
            GestureState::Dragging { id: g, .. } | GestureState::Resizing { id: g, .. } if g == id => {
                self.gesture = GestureState::Idle;
            }
            _ => {}
        }
    }

    /// Clear selection and gesture. The display mapping is kept.
    pub fn reset(&mut self) {
        self.selection = None;
        self.gesture = GestureState::Idle;
    }
}
