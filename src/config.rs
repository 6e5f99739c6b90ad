use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::filter::{FilterState, MassRange};
use crate::data::model::Species;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "PENGUINS_DASHBOARD_CONFIG";
/// Environment variable naming a dataset file.
pub const DATA_ENV: &str = "PENGUINS_DATA";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("mass slider bounds are inverted: min {min} >= max {max}")]
    InvertedBounds { min: f64, max: f64 },
    #[error("default mass {value} is outside the slider bounds [{min}, {max}]")]
    DefaultOutOfBounds { value: f64, min: f64, max: f64 },
    #[error("window title must not be empty")]
    EmptyTitle,
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default, so an empty JSON object is a
/// valid config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub mass_range: MassRange,
    pub default_max_mass: f64,
    pub default_species: BTreeSet<Species>,
    /// Dataset file; the bundled dataset is used when unset.
    pub data_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let mass_range = MassRange::default();
        Self {
            title: "Palmer Penguins dashboard".to_string(),
            mass_range,
            default_max_mass: mass_range.max,
            default_species: Species::ALL.into_iter().collect(),
            data_path: None,
        }
    }
}

impl DashboardConfig {
    /// Read the file named by [`CONFIG_ENV`], or fall back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let MassRange { min, max } = self.mass_range;
        if min >= max {
            return Err(ConfigError::InvertedBounds { min, max });
        }
        if !self.mass_range.contains(self.default_max_mass) {
            return Err(ConfigError::DefaultOutOfBounds {
                value: self.default_max_mass,
                min,
                max,
            });
        }
        if self.title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        Ok(())
    }

    /// Dataset location: CLI argument, then [`DATA_ENV`], then `data_path`.
    pub fn resolve_data_path(&self, cli_arg: Option<PathBuf>) -> Option<PathBuf> {
        cli_arg
            .or_else(|| std::env::var_os(DATA_ENV).map(PathBuf::from))
            .or_else(|| self.data_path.clone())
    }

    /// Filter state a new session starts with.
    pub fn initial_filters(&self) -> FilterState {
        FilterState::new(self.default_species.iter().copied(), self.default_max_mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_controls() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mass_range, MassRange { min: 2000.0, max: 6000.0 });
        let filters = config.initial_filters();
        assert_eq!(filters.max_mass, 6000.0);
        assert_eq!(filters.selected_species.len(), 3);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = DashboardConfig::from_json("{}").expect("valid config");
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = DashboardConfig::from_json(
            r#"{ "default_max_mass": 4500, "default_species": ["Gentoo"], "data_path": "data/penguins.csv" }"#,
        )
        .expect("valid config");
        assert_eq!(config.default_max_mass, 4500.0);
        assert_eq!(config.initial_filters(), FilterState::new([Species::Gentoo], 4500.0));
        assert_eq!(
            config.resolve_data_path(Some(PathBuf::from("cli.csv"))),
            Some(PathBuf::from("cli.csv"))
        );
    }

    #[test]
    fn test_partial_mass_range_keeps_other_bound() {
        let config = DashboardConfig::from_json(r#"{ "mass_range": { "min": 1000 } }"#)
            .expect("valid config");
        assert_eq!(config.mass_range, MassRange { min: 1000.0, max: 6000.0 });

        let config = DashboardConfig::from_json(
            r#"{ "mass_range": { "max": 7000 }, "default_max_mass": 6500 }"#,
        )
        .expect("valid config");
        assert_eq!(config.mass_range, MassRange { min: 2000.0, max: 7000.0 });
        assert_eq!(config.default_max_mass, 6500.0);
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            DashboardConfig::from_json(r#"{ "mass_range": { "min": 6000, "max": 2000 } }"#),
            Err(ConfigError::InvertedBounds { .. })
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{ "default_max_mass": 9000 }"#),
            Err(ConfigError::DefaultOutOfBounds { .. })
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{ "title": "  " }"#),
            Err(ConfigError::EmptyTitle)
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{ "default_species": ["Emperor"] }"#),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = DashboardConfig::from_file(Path::new("/nonexistent/penguins.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
