//! Concurrent multi-source collection.
//!
//! One future per configured station, run to terminal state behind a
//! join barrier. Failure isolation is the central invariant here:
//! nothing a single station hits — transport failure, bad status,
//! malformed payload — ever escapes its task or disturbs the siblings.

use futures::future::join_all;

use vientos_core::{AppConfig, CombinedReport, SourceSpec, StationConfig, StationResult};

use crate::dashboard::{adapt_wind_reading, extract_wind, DashboardClient};
use crate::error::SourceError;
use crate::telemetry::{normalize_telemetry, TelemetryClient};

/// The two upstream clients, built once at startup and shared across
/// requests (ordinary transport reuse; no other cross-request state).
pub struct SourceClients {
    pub telemetry: TelemetryClient,
    pub dashboard: DashboardClient,
}

impl SourceClients {
    /// Builds both clients from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if either `reqwest::Client` cannot
    /// be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Ok(Self {
            telemetry: TelemetryClient::new(
                &config.telemetry_base_url,
                config.request_timeout_secs,
                &config.user_agent,
            )?,
            dashboard: DashboardClient::new(config.request_timeout_secs, &config.user_agent)?,
        })
    }
}

/// Fetches every configured station concurrently and collects exactly
/// one result per station key — never fewer, never more, regardless of
/// how many upstream calls failed.
pub async fn collect_stations(
    clients: &SourceClients,
    stations: &[StationConfig],
) -> CombinedReport {
    let tasks = stations
        .iter()
        .map(|station| async move { (station.key.clone(), collect_station(clients, station).await) });

    join_all(tasks).await.into_iter().collect()
}

/// Runs one station's fetch+normalize pipeline to a terminal result.
pub async fn collect_station(clients: &SourceClients, station: &StationConfig) -> StationResult {
    match &station.source {
        SourceSpec::Telemetry { station_id } => {
            match clients.telemetry.fetch_station(station_id).await {
                Ok(payload) => normalize_telemetry(&payload, &station.name),
                Err(e) => {
                    tracing::warn!(station = %station.key, error = %e, "telemetry fetch failed");
                    StationResult::failure(
                        &station.name,
                        format!("failed to fetch data for {}: {e}", station.name),
                    )
                }
            }
        }
        SourceSpec::Dashboard {
            weather_url,
            wind_url,
        } => collect_dashboard_station(&clients.dashboard, station, weather_url, wind_url).await,
    }
}

/// Both pages are required: wind comes from the wind page, but a station
/// whose general weather page is down is reported down outright — a
/// partial success with unusable primary data is a full failure.
async fn collect_dashboard_station(
    client: &DashboardClient,
    station: &StationConfig,
    weather_url: &str,
    wind_url: &str,
) -> StationResult {
    let (weather, wind) = tokio::join!(client.fetch_page(weather_url), client.fetch_page(wind_url));

    let failure = |page: &str, e: &SourceError| {
        tracing::warn!(station = %station.key, page, error = %e, "dashboard fetch failed");
        StationResult::failure(
            &station.name,
            format!("failed to fetch {page} page for {}: {e}", station.name),
        )
    };

    let wind_html = match wind {
        Ok(body) => body,
        Err(e) => return failure("wind", &e),
    };
    if let Err(e) = weather {
        return failure("weather", &e);
    }

    let reading = extract_wind(&wind_html);
    StationResult::Ok(adapt_wind_reading(reading, &station.name))
}
