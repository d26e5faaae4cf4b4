//! PromptBoard Core Library
//!
//! Platform-agnostic state and geometry for an interactive overlay that lets
//! users select, drag, resize and rotate objects on a generated board.

pub mod board;
pub mod config;
pub mod controller;
pub mod editor;
pub mod geometry;
pub mod interaction;
pub mod metadata;
pub mod object;
pub mod widget;

pub use board::{Board, BoardEdge, BoardResize};
pub use config::{BoardConfig, ConfigError};
pub use controller::{
    BoardController, Generation, GenerationOutcome, MetadataLoad, MetadataLoaded, MountedDecoration,
};
pub use editor::{
    BoxFuture, Decoration, EditorError, EditorImplementation, EditorResult, GenerationResult, MemoryEditor,
    PlaceholderDecoration,
};
pub use geometry::{Compass, DragAnchor, ResizeSnapshot, RotateSnapshot};
pub use interaction::{HitTarget, Interaction};
pub use metadata::MetadataPanel;
pub use object::{LocationField, LocationPatch, ObjectDataPair, ObjectId, ObjectLocation};
pub use widget::{Handle, HandleKind, ManipulationKind, WidgetManager, WidgetState};
