//! Board dimensions and the board resize grips.

use crate::config::BoardConfig;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Width of a board resize grip, measured across the edge.
const GRIP_THICKNESS: f64 = 28.0;
/// Length of a board resize grip, measured along the edge.
const GRIP_LENGTH: f64 = 70.0;

/// Which board dimension a grip resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardEdge {
    /// The grip on the right edge.
    Width,
    /// The grip on the bottom edge.
    Height,
}

/// The rectangular canvas holding all objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    width: f64,
    height: f64,
    min_width: f64,
    min_height: f64,
}

impl Board {
    /// Create a board from configuration defaults.
    pub fn new(config: &BoardConfig) -> Self {
        let mut board = Self {
            width: config.default_board_width,
            height: config.default_board_height,
            min_width: config.min_board_width,
            min_height: config.min_board_height,
        };
        board.resize_to(board.width, board.height);
        board
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Board-local bounds.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Set both dimensions, clamped to the minimums.
    pub fn resize_to(&mut self, width: f64, height: f64) {
        self.set_dimension(BoardEdge::Width, width);
        self.set_dimension(BoardEdge::Height, height);
    }

    /// Current value of one dimension.
    pub fn dimension(&self, edge: BoardEdge) -> f64 {
        match edge {
            BoardEdge::Width => self.width,
            BoardEdge::Height => self.height,
        }
    }

    /// Set one dimension, clamped to its minimum.
    pub fn set_dimension(&mut self, edge: BoardEdge, value: f64) {
        match edge {
            BoardEdge::Width => self.width = clamp_dimension(value, self.min_width),
            BoardEdge::Height => self.height = clamp_dimension(value, self.min_height),
        }
    }

    /// Hit region of a resize grip. Grips sit just outside the board edge.
    pub fn grip_rect(&self, edge: BoardEdge, gap: f64) -> Rect {
        match edge {
            BoardEdge::Width => {
                let x1 = self.width + gap;
                let cy = self.height / 2.0;
                Rect::new(
                    x1 - GRIP_THICKNESS,
                    cy - GRIP_LENGTH / 2.0,
                    x1,
                    cy + GRIP_LENGTH / 2.0,
                )
            }
            BoardEdge::Height => {
                let y1 = self.height + gap;
                let cx = self.width / 2.0;
                Rect::new(
                    cx - GRIP_LENGTH / 2.0,
                    y1 - GRIP_THICKNESS,
                    cx + GRIP_LENGTH / 2.0,
                    y1,
                )
            }
        }
    }

    /// Find the grip under a board-local point.
    pub fn hit_test_grip(&self, point: Point, gap: f64) -> Option<BoardEdge> {
        [BoardEdge::Width, BoardEdge::Height]
            .into_iter()
            .find(|&edge| self.grip_rect(edge, gap).contains(point))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

fn clamp_dimension(value: f64, min: f64) -> f64 {
    if value.is_finite() { value.max(min) } else { min }
}

/// A drag on one of the board resize grips.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardResize {
    pub edge: BoardEdge,
    /// Pointer coordinate along the resized axis when the drag started.
    pub start_pointer: f64,
    /// Board dimension when the drag started.
    pub start_dimension: f64,
}

impl BoardResize {
    /// Start a board resize from a pointer position.
    pub fn start(board: &Board, edge: BoardEdge, pointer: Point) -> Self {
        Self {
            edge,
            start_pointer: axis(edge, pointer),
            start_dimension: board.dimension(edge),
        }
    }

    /// Update the board for the current pointer position.
    pub fn apply(&self, board: &mut Board, pointer: Point) {
        let delta = axis(self.edge, pointer) - self.start_pointer;
        board.set_dimension(self.edge, self.start_dimension + delta);
    }
}

fn axis(edge: BoardEdge, point: Point) -> f64 {
    match edge {
        BoardEdge::Width => point.x,
        BoardEdge::Height => point.y,
    }
}
