//! Widget manager for tracking UI state of board objects.

use super::state::{ManipulationKind, WidgetState};

/// Manages hover, selection and manipulation state for the board.
///
/// Objects are addressed by their index in the controller's replica. At most
/// one object is hovered and at most one is selected; a manipulation always
/// applies to the selected object.
#[derive(Debug, Clone, Default)]
pub struct WidgetManager {
    /// Object currently under the pointer.
    hovered: Option<usize>,
    /// Currently selected object.
    selected: Option<usize>,
    /// Manipulation applied to the selected object.
    manipulation: Option<ManipulationKind>,
}

impl WidgetManager {
    /// Create a new widget manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state of an object.
    pub fn state(&self, index: usize) -> WidgetState {
        if self.selected == Some(index) {
            match self.manipulation {
                Some(kind) => WidgetState::Manipulating(kind),
                None => WidgetState::Selected,
            }
        } else if self.hovered == Some(index) {
            WidgetState::Hovered
        } else {
            WidgetState::Idle
        }
    }

    /// Get the hovered object index (if any).
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Set the hovered object.
    pub fn set_hovered(&mut self, index: Option<usize>) {
        self.hovered = index;
    }

    /// Get the selected object index (if any).
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Check if an object is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected == Some(index)
    }

    /// Select a single object, replacing any previous selection.
    ///
    /// Returns true if the selection changed.
    pub fn select(&mut self, index: usize) -> bool {
        if self.selected == Some(index) {
            return false;
        }
        self.manipulation = None;
        self.selected = Some(index);
        true
    }

    /// Clear the selection. Returns true if something was selected.
    pub fn clear_selection(&mut self) -> bool {
        self.manipulation = None;
        self.selected.take().is_some()
    }

    /// Move the selection to another index without ending it, e.g. after the
    /// replica was reordered.
    pub fn retarget(&mut self, index: usize) {
        if self.selected.is_some() {
            self.selected = Some(index);
        }
    }

    /// Mark the selected object as manipulated.
    ///
    /// Ignored when nothing is selected.
    pub fn begin_manipulation(&mut self, kind: ManipulationKind) {
        if self.selected.is_some() {
            self.manipulation = Some(kind);
        }
    }

    /// Return the selected object to the plain selected state.
    pub fn end_manipulation(&mut self) {
        self.manipulation = None;
    }

    /// Current manipulation (if any).
    pub fn manipulation(&self) -> Option<ManipulationKind> {
        self.manipulation
    }

    /// Forget all state, e.g. when the object collection is replaced.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
