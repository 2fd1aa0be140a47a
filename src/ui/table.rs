use eframe::egui::{Align, Color32, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 36.0;

/// Transaction history for the visible records, newest first.
pub fn transactions_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Transaction history");
    ui.label(
        RichText::new(format!(
            "Showing {} of {} transactions",
            state.visible_indices.len(),
            state.records.len()
        ))
        .weak(),
    );
    ui.separator();

    if state.visible_indices.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add_space(16.0);
            ui.label(RichText::new("No data for the selected period").weak());
            ui.add_space(16.0);
        });
        return;
    }

    let volume_color = volume_color(ui.visuals().dark_mode);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(40.0))
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .vscroll(false)
        .header(22.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("#");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Date & time");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Unit");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Volume");
            });
            header.col(|ui: &mut Ui| {
                ui.strong(&state.secondary_label);
            });
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                let record = &state.records[state.visible_indices[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(RichText::new(record.id.to_string()).weak());
                });
                row.col(|ui: &mut Ui| {
                    ui.vertical(|ui: &mut Ui| {
                        ui.label(RichText::new(&record.date).strong());
                        ui.label(RichText::new(&record.time).small().weak());
                    })
                    .response
                    .on_hover_text(&record.timestamp);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(&record.unit)
                            .strong()
                            .color(state.unit_colors.color_for(&record.unit)),
                    );
                });
                row.col(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(format!("{:.2} L", record.volume))
                            .strong()
                            .color(volume_color),
                    );
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&record.secondary);
                });
            });
        });
}

fn volume_color(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(0x34, 0xd3, 0x99)
    } else {
        Color32::from_rgb(0x05, 0x96, 0x69)
    }
}
