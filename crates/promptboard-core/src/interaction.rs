//! Pointer interaction sessions.
//!
//! A session starts on pointer-down over an object, a handle or a board grip
//! and ends on pointer-up. The controller holds at most one session; starting
//! a new one drops the previous one.

use crate::board::{Board, BoardEdge, BoardResize};
use crate::geometry::{Compass, DragAnchor, ResizeSnapshot, RotateSnapshot};
use crate::widget::{HandleKind, ManipulationKind};
use kurbo::Point;

/// What the pointer is over, in board-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// One of the board resize grips.
    BoardGrip(BoardEdge),
    /// A handle of the selected object.
    ObjectHandle(usize, HandleKind),
    /// The body of an object.
    Object(usize),
    /// The host's metadata side panel. Never clears the selection.
    SidePanel,
    /// Nothing interactive.
    Empty,
}

/// The active pointer session.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// Moving an object.
    Drag { index: usize, anchor: DragAnchor },
    /// Resizing an object from one of its handles.
    Resize { index: usize, snapshot: ResizeSnapshot },
    /// Rotating an object around its center.
    Rotate { index: usize, snapshot: RotateSnapshot },
    /// Resizing the board.
    Board(BoardResize),
}

impl Interaction {
    /// Object the session applies to, if any.
    pub fn object_index(&self) -> Option<usize> {
        match self {
            Interaction::Drag { index, .. }
            | Interaction::Resize { index, .. }
            | Interaction::Rotate { index, .. } => Some(*index),
            Interaction::Board(_) => None,
        }
    }

    /// Manipulation kind shown on the object, if any.
    pub fn manipulation(&self) -> Option<ManipulationKind> {
        match self {
            Interaction::Drag { .. } => Some(ManipulationKind::Drag),
            Interaction::Resize { snapshot, .. } => Some(ManipulationKind::Resize(snapshot.handle())),
            Interaction::Rotate { .. } => Some(ManipulationKind::Rotate),
            Interaction::Board(_) => None,
        }
    }

    /// Start a board grip drag.
    pub fn board(board: &Board, edge: BoardEdge, pointer: Point) -> Self {
        Interaction::Board(BoardResize::start(board, edge, pointer))
    }

    /// Whether this is a resize from a given handle.
    pub fn is_resize(&self, handle: Compass) -> bool {
        matches!(self, Interaction::Resize { snapshot, .. } if snapshot.handle() == handle)
    }
}
