use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use vientos_core::{StationRecord, StationResult};

use crate::error::SourceError;

/// HTTP client for the JSON telemetry API.
///
/// One `GET <base>/<station_id>` per station returns the historic
/// variables payload for that station. The payload is treated as
/// untrusted input: it is fetched as a raw `serde_json::Value` and
/// shape-validated by [`normalize_telemetry`] before any field access.
pub struct TelemetryClient {
    client: Client,
    base_url: String,
}

impl TelemetryClient {
    /// Creates a `TelemetryClient` with the configured timeout and `User-Agent`.
    ///
    /// The timeout bounds each station fetch; on expiry the fetch surfaces
    /// as [`SourceError::Http`] and fails only that station.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Fetches the raw telemetry payload for one upstream station id.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] — network failure or timeout.
    /// - [`SourceError::UnexpectedStatus`] — any non-2xx status.
    /// - [`SourceError::Deserialize`] — response body is not valid JSON.
    pub async fn fetch_station(&self, station_id: &str) -> Result<Value, SourceError> {
        let url = format!("{}/{station_id}", self.base_url);
        tracing::debug!(url = %url, "fetching telemetry payload");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Value>(&body).map_err(|e| SourceError::Deserialize {
            context: format!("telemetry payload from {url}"),
            source: e,
        })
    }
}

/// Normalizes one station's raw telemetry payload into the unified record.
///
/// Requires `estacion`, `fechaMedicion`, and a `variables` object at the
/// top level; anything else yields the failure arm without attempting
/// partial extraction. Series are time-ordered oldest→newest, so the
/// latest reading is the tail of each array.
#[must_use]
pub fn normalize_telemetry(payload: &Value, station_name: &str) -> StationResult {
    match try_normalize(payload, station_name) {
        Ok(record) => StationResult::Ok(record),
        Err(e) => {
            tracing::warn!(station = station_name, error = %e, "telemetry payload rejected");
            StationResult::failure(station_name, e.to_string())
        }
    }
}

fn try_normalize(payload: &Value, station_name: &str) -> Result<StationRecord, SourceError> {
    let root = payload.as_object().ok_or(SourceError::PayloadShape)?;

    let (Some(external_id), Some(measured_at), Some(variables)) = (
        root.get("estacion").and_then(scalar_string),
        root.get("fechaMedicion").and_then(Value::as_str),
        root.get("variables").and_then(Value::as_object),
    ) else {
        return Err(SourceError::PayloadShape);
    };

    let wind_speed = latest_number(variables.get("VelocidadViento"), station_name, "VelocidadViento");
    let wind_gust = latest_number(variables.get("RafagaViento"), station_name, "RafagaViento");
    let wind_direction = latest_text(variables.get("DireccionViento"));

    Ok(StationRecord {
        station_name: station_name.to_owned(),
        external_id: Some(external_id),
        // Pass-through of the source's own timestamp string, no reformatting.
        measured_at: measured_at.to_owned(),
        wind_speed,
        wind_gust,
        wind_direction,
    })
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Last element of a series, if the series exists and is a non-empty array.
fn latest_element(series: Option<&Value>) -> Option<&Value> {
    series.and_then(Value::as_array).and_then(|a| a.last())
}

/// Latest reading of a numeric series. JSON null stays `None` (not zero);
/// numeric strings are accepted with a decimal comma; anything else
/// degrades to `None` with a warning rather than failing the record.
fn latest_number(series: Option<&Value>, station: &str, series_name: &str) -> Option<f64> {
    match latest_element(series)? {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let parsed = s.trim().replace(',', ".").parse::<f64>().ok();
            if parsed.is_none() {
                tracing::warn!(
                    station,
                    series = series_name,
                    value = %s,
                    "latest series value is not numeric"
                );
            }
            parsed
        }
        other => {
            tracing::warn!(
                station,
                series = series_name,
                value = %other,
                "unexpected series element type"
            );
            None
        }
    }
}

/// Latest reading of a textual series, stringified when the upstream
/// reports it as a number (e.g. a direction in degrees).
fn latest_text(series: Option<&Value>) -> Option<String> {
    match latest_element(series)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
