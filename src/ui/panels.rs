use eframe::egui::{self, RichText, Slider, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the filter panel: year slider and country selector. Widgets write
/// straight into `AppState`; the dashboard recomputes from it next frame.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let (min_year, max_year) = state.year_bounds();
    ui.strong("Select year");
    ui.add(Slider::new(&mut state.selected_year, min_year..=max_year));
    ui.add_space(8.0);

    ui.strong("Select country");
    egui::ComboBox::from_id_salt("country_filter")
        .selected_text(state.selected_country.clone())
        .width(ui.available_width() * 0.9)
        .show_ui(ui, |ui: &mut Ui| {
            for country in &state.table.countries {
                ui.selectable_value(&mut state.selected_country, country.clone(), country);
            }
        });

    ui.add_space(12.0);
    ui.separator();
    ui.label(
        RichText::new(format!(
            "{} records · {} entities · {}-{}",
            state.table.len(),
            state.table.countries.len(),
            min_year,
            max_year
        ))
        .small(),
    );
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar.
pub fn top_bar(ui: &mut Ui, _state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Global Renewable Energy Trends");
        ui.separator();
        ui.label("Capacity, GDP, and population dynamics per country and year");
    });
}
