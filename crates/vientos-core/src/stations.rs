use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Where a station's readings come from.
///
/// `telemetry` stations are queried from the JSON time-series API by
/// upstream identifier; `dashboard` stations are scraped from two
/// HTML page variants (one for general weather, one for wind).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SourceSpec {
    Telemetry {
        station_id: String,
    },
    Dashboard {
        weather_url: String,
        wind_url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Stable key used across the API surface. Fixes the combined
    /// response key set; never derived from upstream responses.
    pub key: String,
    /// Human-readable station label.
    pub name: String,
    #[serde(flatten)]
    pub source: SourceSpec,
}

#[derive(Debug, Deserialize)]
pub struct StationRegistry {
    pub stations: Vec<StationConfig>,
}

impl StationRegistry {
    /// Look up a station by its configured key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&StationConfig> {
        self.stations.iter().find(|s| s.key == key)
    }
}

/// Load and validate the station registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_stations(path: &Path) -> Result<StationRegistry, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StationsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let registry: StationRegistry =
        serde_yaml::from_str(&content).map_err(ConfigError::StationsFileParse)?;

    validate_stations(&registry)?;

    Ok(registry)
}

fn validate_stations(registry: &StationRegistry) -> Result<(), ConfigError> {
    if registry.stations.is_empty() {
        return Err(ConfigError::Validation(
            "at least one station must be configured".to_string(),
        ));
    }

    let mut seen_keys = HashSet::new();

    for station in &registry.stations {
        if station.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "station '{}' must have a non-empty name",
                station.key
            )));
        }

        if station.key.is_empty()
            || !station
                .key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ConfigError::Validation(format!(
                "station key '{}' must be lowercase alphanumeric with dashes",
                station.key
            )));
        }

        if !seen_keys.insert(station.key.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate station key: '{}'",
                station.key
            )));
        }
    }

    Ok(())
}
