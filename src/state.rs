use crate::data::model::{EnergyTable, YEAR_MAX, YEAR_MIN};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering: the loaded table plus the
/// two filter selections. Views are recomputed from (table, filters) every
/// frame; there is no derived-view cache.
pub struct AppState {
    /// The process-lifetime table, loaded once at startup.
    pub table: &'static EnergyTable,

    /// Year selected in the sidebar slider.
    pub selected_year: u16,

    /// Country selected in the sidebar combo box.
    pub selected_country: String,
}

impl AppState {
    /// Initialise filters to the latest year and the `World` aggregate when
    /// present (first country otherwise).
    pub fn new(table: &'static EnergyTable) -> Self {
        let selected_year = table.years.last().copied().unwrap_or(YEAR_MAX);
        let selected_country = if table.countries.iter().any(|c| c == "World") {
            "World".to_string()
        } else {
            table.countries.first().cloned().unwrap_or_default()
        };
        AppState {
            table,
            selected_year,
            selected_country,
        }
    }

    /// Slider bounds: the years actually present in the data.
    pub fn year_bounds(&self) -> (u16, u16) {
        self.table.year_span().unwrap_or((YEAR_MIN, YEAR_MAX))
    }
}
