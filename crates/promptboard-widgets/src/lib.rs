//! egui front end for the PromptBoard controller.
//!
//! - **Board**: board surface, overlays, handles and resize grips
//! - **Side panel**: location fields and metadata editor
//! - **Prompt**: prompt text, submit button and status
//! - **Tasks**: per-frame polling of generation and metadata requests
//!
//! A typical frame polls the [`TaskRunner`] and then shows the widgets:
//!
//! ```ignore
//! tasks.poll_and_repaint(ctx, &mut controller);
//! let data = egui::SidePanel::right("data").show(ctx, |ui| side_panel(ui, &mut controller));
//! egui::TopBottomPanel::bottom("prompt").show(ctx, |ui| prompt_bar(ui, &mut controller, &mut tasks));
//! egui::CentralPanel::default().show(ctx, |ui| {
//!     BoardView::new()
//!         .side_panel_rect(data.response.rect)
//!         .show(ui, &mut controller, &mut tasks)
//! });
//! ```
//!
//! Presses anywhere outside the board clear the selection, except inside the
//! rect passed to [`BoardView::side_panel_rect`].

pub mod board;
pub mod layout;
pub mod prompt;
pub mod side_panel;
pub mod tasks;

pub use board::{BoardTransform, BoardView, resize_cursor, view_margin};
pub use layout::{panel_frame, section_label, separator};
pub use prompt::prompt_bar;
pub use side_panel::side_panel;
pub use tasks::TaskRunner;

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Resize handle edge length
    pub const HANDLE_SIZE: f32 = 8.0;
    /// Resize handle corner radius
    pub const HANDLE_RADIUS: u8 = 2;
    /// Rotate handle radius
    pub const ROTATE_HANDLE_RADIUS: f32 = 5.0;
    /// Board corner radius
    pub const BOARD_RADIUS: u8 = 4;
    /// Space right of and below the board grips
    pub const BOARD_PADDING: f32 = 8.0;
    /// Inset of the painted grip inside its hit region
    pub const GRIP_INSET: f32 = 4.0;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
    /// Board background
    pub const BOARD_BG: Color32 = Color32::WHITE;
    /// Object areas when "show areas" is on
    pub const AREA_TINT: Color32 = Color32::from_rgba_premultiplied(30, 65, 123, 50);
    /// Placeholder object fill
    pub const PLACEHOLDER_FILL: Color32 = Color32::from_rgb(224, 224, 224);
    /// Placeholder object outline
    pub const PLACEHOLDER_STROKE: Color32 = Color32::from_rgb(189, 189, 189);
    /// Handle fill
    pub const HANDLE_FILL: Color32 = Color32::WHITE;
    /// Board grip background
    pub const GRIP_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Error text
    pub const ERROR: Color32 = Color32::from_rgb(220, 38, 38);
}
