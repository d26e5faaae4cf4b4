//! Widget state definitions.

use crate::geometry::Compass;

/// The UI state of one board object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    /// No interaction.
    #[default]
    Idle,
    /// The pointer is over the object.
    Hovered,
    /// The object is selected (shows handles, metadata panel is open).
    Selected,
    /// The selected object is being dragged, resized or rotated.
    Manipulating(ManipulationKind),
}

impl WidgetState {
    /// Check if the object is selected (either idle-selected or manipulated).
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Manipulating(_))
    }

    /// Check if a manipulation is in progress.
    pub fn is_manipulating(&self) -> bool {
        matches!(self, Self::Manipulating(_))
    }

    /// Whether an outline should be drawn around the object.
    pub fn is_highlighted(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Kind of manipulation applied to the selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulationKind {
    /// Moving the whole object.
    Drag,
    /// Dragging one of the eight resize handles.
    Resize(Compass),
    /// Dragging the rotate handle.
    Rotate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        let rotating = WidgetState::Manipulating(ManipulationKind::Rotate);
        assert!(rotating.is_manipulating());
        assert!(rotating.is_selected());
        assert!(!WidgetState::Selected.is_manipulating());
        assert!(!WidgetState::Hovered.is_selected());
        assert!(WidgetState::Hovered.is_highlighted());
        assert!(!WidgetState::Idle.is_highlighted());
    }
}
