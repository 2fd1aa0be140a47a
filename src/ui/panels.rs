use eframe::egui::{self, Align, Color32, Layout, RichText, Ui};

use crate::app::UiAction;
use crate::data::filter::{Period, UnitFilter};
use crate::prefs::ThemeChoice;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the header: menu, title, last update, refresh and theme controls.
pub fn top_bar(ui: &mut Ui, state: &AppState) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open snapshot…").clicked() {
                if let Some(path) = open_snapshot_dialog() {
                    actions.push(UiAction::OpenSnapshot(path));
                }
                ui.close_menu();
            }
        });

        ui.separator();
        ui.heading(RichText::new("⛽ BBM Monitoring").strong());
        ui.label(RichText::new(&state.source_label).weak());

        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
            egui::ComboBox::from_id_salt("theme")
                .selected_text(state.theme.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for theme in ThemeChoice::ALL {
                        if ui.selectable_label(state.theme == theme, theme.label()).clicked()
                            && state.theme != theme
                        {
                            actions.push(UiAction::SetTheme(theme));
                        }
                    }
                });

            let refresh = ui.add_enabled(!state.is_refreshing(), egui::Button::new("⟳ Refresh"));
            if refresh.clicked() {
                actions.push(UiAction::Refresh);
            }
            if state.is_refreshing() {
                ui.spinner();
            }

            let updated = state
                .last_update
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());
            ui.label(format!("Last update: {updated}"));
        });
    });

    actions
}

fn open_snapshot_dialog() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open sheet snapshot")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file()
}

/// Fetch failure banner. Disappears on the next successful fetch.
pub fn error_banner(ui: &mut Ui, message: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("⚠").color(Color32::RED).strong());
        ui.label(RichText::new(format!("Error: {message}")).color(Color32::RED));
    });
}

/// Blocking loader, only shown before the first fetch completes.
pub fn loading_screen(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.spinner();
            ui.label(RichText::new("Loading data…").size(18.0));
        });
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filters and statistics
// ---------------------------------------------------------------------------

/// Render the filter selectors and the statistic cards.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ui.strong("📅 Period");
    let current_period = state.period;
    egui::ComboBox::from_id_salt("period")
        .selected_text(current_period.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for period in Period::ALL {
                if ui
                    .selectable_label(current_period == period, period.label())
                    .clicked()
                {
                    state.set_period(period);
                }
            }
        });

    ui.add_space(6.0);
    ui.strong("🚚 Unit");
    let current_unit = state.unit.clone();
    let options = state.unit_options.clone();
    egui::ComboBox::from_id_salt("unit")
        .selected_text(current_unit.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(current_unit == UnitFilter::All, "All units")
                .clicked()
            {
                state.set_unit(UnitFilter::All);
            }
            for unit in &options {
                let candidate = UnitFilter::Unit(unit.clone());
                let text = RichText::new(unit).color(state.unit_colors.color_for(unit));
                if ui.selectable_label(current_unit == candidate, text).clicked() {
                    state.set_unit(candidate);
                }
            }
        });

    ui.add_space(12.0);
    ui.heading("Summary");
    ui.separator();

    let summary = &state.summary;
    stat_card(ui, "Total volume", &format!("{:.2}", summary.total_volume), "litres");
    stat_card(ui, "Transactions", &summary.total_transactions.to_string(), "refuellings");
    stat_card(ui, "Active units", &summary.unique_units.to_string(), "vehicles");
    stat_card(ui, "Average", &format!("{:.2}", summary.average_volume), "litres / transaction");
}

fn stat_card(ui: &mut Ui, title: &str, value: &str, caption: &str) {
    ui.group(|ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(title).weak());
        ui.label(RichText::new(value).size(24.0).strong());
        ui.label(RichText::new(caption).small().weak());
    });
    ui.add_space(4.0);
}
