use std::sync::Arc;

use super::filter::{filtered_indices, FilterState, MassRange};
use super::model::{Dataset, Record, Species};

// ---------------------------------------------------------------------------
// FilteredView – memoized (dataset, filters) → indices
// ---------------------------------------------------------------------------

/// Owns one session's [`FilterState`] and caches the indices that pass it.
///
/// Setters mark the cache stale only when the state actually changes; the
/// next read rescans the dataset once and every later read in the same
/// frame returns the cached slice.
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Arc<Dataset>,
    filters: FilterState,
    mass_range: MassRange,
    cached: Option<Vec<usize>>,
    recomputes: u64,
}

impl FilteredView {
    pub fn new(dataset: Arc<Dataset>, filters: FilterState, mass_range: MassRange) -> Self {
        let filters = FilterState {
            max_mass: mass_range.clamp(filters.max_mass),
            ..filters
        };
        Self {
            dataset,
            filters,
            mass_range,
            cached: None,
            recomputes: 0,
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn mass_range(&self) -> MassRange {
        self.mass_range
    }

    /// Whether the next read will rescan the dataset.
    #[cfg(test)]
    pub fn is_stale(&self) -> bool {
        self.cached.is_none()
    }

    /// Number of dataset scans performed so far.
    #[cfg(test)]
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    // -- setters --

    /// Set the mass threshold, clamped into the slider bounds. NaN is ignored.
    pub fn set_max_mass(&mut self, max_mass: f64) {
        if max_mass.is_nan() {
            return;
        }
        let max_mass = self.mass_range.clamp(max_mass);
        if max_mass != self.filters.max_mass {
            self.filters.max_mass = max_mass;
            self.invalidate();
        }
    }

    /// Replace the whole species selection.
    pub fn set_species(&mut self, selected: impl IntoIterator<Item = Species>) {
        let selected = selected.into_iter().collect();
        if selected != self.filters.selected_species {
            self.filters.selected_species = selected;
            self.invalidate();
        }
    }

    pub fn set_species_selected(&mut self, species: Species, selected: bool) {
        let changed = if selected {
            self.filters.selected_species.insert(species)
        } else {
            self.filters.selected_species.remove(&species)
        };
        if changed {
            self.invalidate();
        }
    }

    pub fn select_all_species(&mut self) {
        self.set_species(Species::ALL);
    }

    pub fn select_no_species(&mut self) {
        self.set_species([]);
    }

    fn invalidate(&mut self) {
        self.cached = None;
    }

    // -- getters --

    /// Indices of records passing the current filters, in dataset order.
    pub fn indices(&mut self) -> &[usize] {
        if self.cached.is_none() {
            let indices = filtered_indices(&self.dataset, &self.filters);
            self.recomputes += 1;
            log::debug!(
                "Filtered view recomputed: {} of {} records (species {:?}, mass < {})",
                indices.len(),
                self.dataset.len(),
                self.filters.selected_species,
                self.filters.max_mass
            );
            self.cached = Some(indices);
        }
        self.cached.as_deref().unwrap_or_default()
    }

    /// Records passing the current filters, in dataset order.
    pub fn records(&mut self) -> impl Iterator<Item = &Record> + '_ {
        self.indices();
        let dataset = &self.dataset;
        self.cached
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(move |&i| dataset.get(i))
    }

    pub fn len(&mut self) -> usize {
        self.indices().len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.indices().is_empty()
    }
}
