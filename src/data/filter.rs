use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{Dataset, Record, Species};

// ---------------------------------------------------------------------------
// Filter predicate: selected species + mass threshold
// ---------------------------------------------------------------------------

/// Inclusive bounds of the mass slider, in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassRange {
    pub min: f64,
    pub max: f64,
}

impl Default for MassRange {
    fn default() -> Self {
        Self {
            min: 2000.0,
            max: 6000.0,
        }
    }
}

impl MassRange {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// The user-controlled filter inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub selected_species: BTreeSet<Species>,
    /// Records pass only when `body_mass_g < max_mass`.
    pub max_mass: f64,
}

impl FilterState {
    pub fn new(selected_species: impl IntoIterator<Item = Species>, max_mass: f64) -> Self {
        Self {
            selected_species: selected_species.into_iter().collect(),
            max_mass,
        }
    }

    /// Whether a single record passes both predicates.
    ///
    /// A record without a body mass never passes: a missing value is not
    /// less than any threshold.
    pub fn matches(&self, record: &Record) -> bool {
        self.selected_species.contains(&record.species)
            && record.body_mass_g.is_some_and(|mass| mass < self.max_mass)
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(Species::ALL, MassRange::default().max)
    }
}

/// Return indices of records that pass the filter, in dataset order.
pub fn filtered_indices(dataset: &Dataset, filters: &FilterState) -> Vec<usize> {
    if filters.selected_species.is_empty() {
        return Vec::new();
    }
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| filters.matches(record))
        .map(|(i, _)| i)
        .collect()
}
