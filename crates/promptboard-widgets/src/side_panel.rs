//! Side panel: board size, location fields and editable metadata of the
//! selected object.

use egui::{DragValue, Grid, TextEdit, Ui};
use promptboard_core::{BoardController, LocationField};

use crate::layout::{section_label, separator};
use crate::theme;

/// Show the side panel for the selected object.
pub fn side_panel(ui: &mut Ui, controller: &mut BoardController) {
    board_size(ui, controller);
    separator(ui);

    let Some(object) = controller.selected_object().cloned() else {
        ui.label(egui::RichText::new("Select an object to edit it.").color(theme::TEXT_MUTED));
        return;
    };

    ui.heading(object.id.as_str());
    ui.add_space(4.0);

    section_label(ui, "LOCATION");
    Grid::new("promptboard_location").num_columns(2).show(ui, |ui| {
        for field in LocationField::ALL {
            ui.label(field.label());
            let mut value = field.value_of(&object);
            let drag = DragValue::new(&mut value).speed(1.0);
            let drag = match field {
                LocationField::Rotation => drag.range(0.0..=359.0).suffix("°"),
                LocationField::ZIndex => drag.fixed_decimals(0),
                _ => drag.max_decimals(1),
            };
            if ui.add(drag).changed() {
                controller.edit_location_field(field, value);
            }
            ui.end_row();
        }
    });

    separator(ui);
    section_label(ui, "DATA");
    metadata_rows(ui, controller, &object.id);
}

fn board_size(ui: &mut Ui, controller: &mut BoardController) {
    section_label(ui, "BOARD");
    let mut width = controller.board().width();
    let mut height = controller.board().height();
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui.add(DragValue::new(&mut width).prefix("W ").max_decimals(0)).changed();
        changed |= ui.add(DragValue::new(&mut height).prefix("H ").max_decimals(0)).changed();
    });
    if changed {
        controller.resize_board(width, height);
    }
}

fn metadata_rows(ui: &mut Ui, controller: &mut BoardController, id: &str) {
    let Some(panel) = controller.metadata_panel_mut() else {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading...");
        });
        return;
    };
    let focus = panel.take_focus();
    let pairs = panel.pairs().to_vec();

    let mut removed = None;
    Grid::new("promptboard_metadata").num_columns(3).show(ui, |ui| {
        for (row, pair) in pairs.iter().enumerate() {
            ui.label(pair.key.as_str());
            let mut value = pair.value.clone();
            let response = ui.add(TextEdit::singleline(&mut value).desired_width(140.0));
            if focus == Some(row) {
                response.request_focus();
            }
            if response.changed() {
                controller.mutate_metadata_at(id, row, &value);
            }
            if ui.small_button("x").on_hover_text("Remove key").clicked() {
                removed = Some(row);
            }
            ui.end_row();
        }
    });

    if let Some(row) = removed {
        controller.remove_metadata_at(id, row);
    }
    if ui.button("Add key").clicked() {
        controller.add_metadata_key(id);
    }
}
