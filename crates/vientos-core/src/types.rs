use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unified per-station output unit. Every source's data is normalized
/// into this shape before assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub station_name: String,
    /// Upstream station identifier; `None` for the dashboard source.
    pub external_id: Option<String>,
    /// Source measurement timestamp, passed through verbatim for
    /// telemetry stations. The dashboard source exposes no per-reading
    /// timestamp, so its records carry the fetch time instead.
    pub measured_at: String,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub wind_direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationFailure {
    pub error: String,
    pub station_name: String,
}

/// Terminal outcome for one station: a normalized record or a captured
/// failure. Serializes untagged so the wire shape is either the record
/// object or `{"error": …, "station_name": …}` — callers distinguish
/// the two by the presence of the `error` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StationResult {
    Ok(StationRecord),
    Err(StationFailure),
}

impl StationResult {
    #[must_use]
    pub fn failure(station_name: impl Into<String>, error: impl Into<String>) -> Self {
        StationResult::Err(StationFailure {
            error: error.into(),
            station_name: station_name.into(),
        })
    }

    #[must_use]
    pub fn is_err(&self) -> bool {
        matches!(self, StationResult::Err(_))
    }
}

/// Combined response: one entry per configured station key, always —
/// regardless of how many upstream calls failed. `BTreeMap` keeps the
/// key order deterministic.
pub type CombinedReport = BTreeMap<String, StationResult>;
