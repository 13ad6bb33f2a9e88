//! Drag lifecycle for drawing new mappings.
//!
//! ```text
//! Idle --begin (editing)--> Dragging --update--> Dragging
//!   ^                           |
//!   +------ end / cancel -------+
//! ```
//!
//! Only one drag exists at a time. Multi-touch is not modeled: callers feed
//! the first contact point only.

use super::geometry::{CanonicalRect, PointerSample};
use super::mapping::Mapping;
use super::store::MappingStore;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        start: PointerSample,
        current: PointerSample,
    },
}

/// Per-surface drawing state: the edit-mode flag plus the drag in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawInteraction {
    editing: bool,
    state: DragState,
}

impl DrawInteraction {
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Toggle edit mode. Leaving edit mode abandons any drag in progress.
    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
        if !editing {
            self.cancel();
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Gesture start. Ignored entirely while not editing.
    pub fn begin(&mut self, sample: PointerSample) {
        if !self.editing {
            return;
        }
        self.state = DragState::Dragging {
            start: sample,
            current: sample,
        };
    }

    /// Gesture move. Only tracks the pointer; never touches the store.
    pub fn update(&mut self, sample: PointerSample) {
        if let DragState::Dragging { current, .. } = &mut self.state {
            *current = sample;
        }
    }

    /// Gesture end. Commits the dragged rectangle to `store` unless its area
    /// is below `min_area`. A stray end with no drag in progress is a no-op.
    pub fn end(&mut self, store: &mut MappingStore, min_area: f32) -> Option<Mapping> {
        let DragState::Dragging { start, current } = std::mem::take(&mut self.state) else {
            return None;
        };
        let rect = CanonicalRect::normalize(start, current);
        if rect.area() < min_area {
            return None;
        }
        Some(store.append(rect))
    }

    /// Abandon the drag without committing anything.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Live rectangle for the dashed preview overlay.
    pub fn preview(&self) -> Option<CanonicalRect> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { start, current } => Some(CanonicalRect::normalize(start, current)),
        }
    }
}
