//! Prompt bar: prompt text, submit button and generation status.

use egui::{Button, Key, TextEdit, Ui};
use promptboard_core::BoardController;

use crate::layout::panel_frame;
use crate::tasks::TaskRunner;
use crate::theme;

/// Show the prompt bar. Submitting hands the generation to `tasks`.
///
/// Ctrl/Cmd+Enter submits as well. Input is disabled while a generation is
/// pending.
pub fn prompt_bar(ui: &mut Ui, controller: &mut BoardController, tasks: &mut TaskRunner) {
    panel_frame().show(ui, |ui| prompt_contents(ui, controller, tasks));
}

fn prompt_contents(ui: &mut Ui, controller: &mut BoardController, tasks: &mut TaskRunner) {
    let pending = controller.is_pending();

    let edit = TextEdit::multiline(controller.prompt_mut())
        .hint_text("Describe the screen to generate")
        .desired_rows(3)
        .desired_width(f32::INFINITY);
    let edit_response = ui.add_enabled(!pending, edit);
    let shortcut = edit_response.has_focus()
        && ui.input(|i| i.modifiers.command && i.key_pressed(Key::Enter));

    ui.horizontal(|ui| {
        let label = if pending { "Generating..." } else { "Generate" };
        let clicked = ui.add_enabled(!pending, Button::new(label)).clicked();
        if pending {
            ui.spinner();
        }
        if clicked || shortcut {
            if let Some(generation) = controller.begin_submit() {
                tasks.spawn_generation(generation);
            }
        }

        let mut show_areas = controller.show_areas();
        if ui.checkbox(&mut show_areas, "Show areas").changed() {
            controller.toggle_areas();
        }
        if ui
            .button("Refresh")
            .on_hover_text("Reload objects from the editor")
            .clicked()
        {
            controller.refresh();
        }
    });

    if let Some(error) = controller.last_error() {
        ui.colored_label(theme::ERROR, error);
    }
}
