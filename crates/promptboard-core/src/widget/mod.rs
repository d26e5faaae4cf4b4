//! Widget system for managing interactive object states.
//!
//! Objects remain pure data ([`ObjectLocation`](crate::ObjectLocation)).
//! This module tracks the UI state layered on top of them:
//! - Hover and single selection
//! - The manipulation currently applied to the selected object
//! - Handle placement for the selected object

mod handles;
mod manager;
mod state;

pub use handles::{Handle, HandleKind, hit_test_handles, object_handles};
pub use manager::WidgetManager;
pub use state::{ManipulationKind, WidgetState};
