use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::color::SpeciesColors;
use crate::config::DashboardConfig;
use crate::data::export;
use crate::data::grid::{GridFilters, TableColumn};
use crate::data::model::{Dataset, Record, Species};
use crate::data::stats::Summary;
use crate::data::view::FilteredView;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One session's view-model, independent of rendering. The dataset is shared;
/// everything else belongs to this session alone.
pub struct AppState {
    /// Species/mass filters and their cached result.
    pub view: FilteredView,

    /// Per-column text filters of the data grid.
    pub grid: GridFilters,

    /// Stable species colours for chart and controls.
    pub colors: SpeciesColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, config: &DashboardConfig) -> Self {
        Self {
            view: FilteredView::new(dataset, config.initial_filters(), config.mass_range),
            grid: GridFilters::default(),
            colors: SpeciesColors::default(),
            status_message: None,
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        self.view.dataset()
    }

    // -- filter controls --

    pub fn set_max_mass(&mut self, max_mass: f64) {
        self.view.set_max_mass(max_mass);
    }

    pub fn set_species_selected(&mut self, species: Species, selected: bool) {
        self.view.set_species_selected(species, selected);
    }

    pub fn select_all(&mut self) {
        self.view.select_all_species();
    }

    pub fn select_none(&mut self) {
        self.view.select_no_species();
    }

    pub fn set_grid_filter(&mut self, column: TableColumn, text: String) {
        self.grid.set_input(column, text);
    }

    // -- consumers --

    /// Count and mean bill measurements over the filtered view.
    pub fn summary(&mut self) -> Summary {
        Summary::from_records(self.view.records())
    }

    /// Records in the filtered view that also pass the grid's column filters.
    pub fn table_records(&mut self) -> Vec<&Record> {
        let grid = &self.grid;
        self.view.records().filter(|r| grid.matches(r)).collect()
    }

    /// Write the rows currently shown in the grid to a CSV file and record
    /// the outcome in `status_message`.
    pub fn export_table(&mut self, path: &Path) -> Result<usize> {
        let result = export::export_csv(path, self.table_records());
        self.status_message = Some(match &result {
            Ok(n) => format!("Exported {n} rows to {}", path.display()),
            Err(e) => format!("Error: {e:#}"),
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bundled;
    use crate::data::model::fixtures::small_dataset;

    fn state() -> AppState {
        AppState::new(Arc::new(small_dataset()), &DashboardConfig::default())
    }

    #[test]
    fn test_initial_state_shows_all_weighed_records() {
        let mut s = state();
        let summary = s.summary();
        assert_eq!(summary.count, 9);
        assert_eq!(s.table_records().len(), 9);
    }

    #[test]
    fn test_consumers_share_one_recompute() {
        let mut s = state();
        s.set_max_mass(4000.0);
        let _ = s.summary();
        let _ = s.view.records().count();
        let _ = s.table_records();
        assert_eq!(s.view.recompute_count(), 1);
    }

    #[test]
    fn test_empty_selection_renders_placeholders() {
        let mut s = state();
        s.select_none();
        let summary = s.summary();
        assert_eq!(summary.count_text(), "0");
        assert_eq!(summary.bill_length_text(), "N/A");
        assert_eq!(summary.bill_depth_text(), "N/A");
        assert!(s.view.is_empty());
        assert!(s.table_records().is_empty());
    }

    #[test]
    fn test_grid_filter_does_not_touch_summary() {
        let mut s = state();
        s.set_grid_filter(TableColumn::Island, "dream".to_string());
        assert_eq!(s.table_records().len(), 2);
        assert_eq!(s.summary().count, 9);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let dataset = Arc::new(load_bundled().expect("bundled data"));
        let config = DashboardConfig::default();
        let mut a = AppState::new(Arc::clone(&dataset), &config);
        let mut b = AppState::new(Arc::clone(&dataset), &config);

        a.set_species_selected(Species::Gentoo, false);
        a.set_max_mass(4000.0);

        assert!(a.view.records().all(|r| r.species != Species::Gentoo));
        assert!(b.view.records().any(|r| r.species == Species::Gentoo));
        assert_eq!(b.view.filters().max_mass, 6000.0);
        assert_eq!(Arc::strong_count(&dataset), 3);
    }

    #[test]
    fn test_bundled_minimum_mass_is_empty() {
        let dataset = Arc::new(load_bundled().expect("bundled data"));
        let mut s = AppState::new(dataset, &DashboardConfig::default());
        s.set_max_mass(2000.0);
        assert_eq!(s.summary().count, 0);
    }

    #[test]
    fn test_export_reports_status() {
        let mut s = state();
        s.set_species_selected(Species::Adelie, false);
        let path = std::env::temp_dir().join(format!(
            "penguins-dashboard-export-{}.csv",
            std::process::id()
        ));
        let written = s.export_table(&path);
        let text = std::fs::read_to_string(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(written.expect("export succeeds"), 6);
        assert_eq!(text.expect("file written").lines().count(), 7);
        assert!(s
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Exported 6 rows")));

        let bad = Path::new("/nonexistent-dir/penguins.csv");
        assert!(s.export_table(bad).is_err());
        assert!(s.status_message.as_deref().is_some_and(|m| m.starts_with("Error")));
    }
}
