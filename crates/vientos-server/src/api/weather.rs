use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};

use vientos_core::SourceSpec;

use super::{find_station, ApiError, AppState};
use crate::middleware::RequestId;

/// Full weather report for a dashboard station. Only dashboard stations
/// publish the general weather page; telemetry stations are a 400.
pub async fn station_weather(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let station = match find_station(&state, &key, &req_id) {
        Ok(station) => station,
        Err(e) => return e.into_response(),
    };

    let SourceSpec::Dashboard {
        weather_url,
        wind_url,
    } = &station.source
    else {
        return ApiError::new(
            req_id.0,
            "bad_request",
            format!("station {key} does not publish a weather dashboard"),
        )
        .into_response();
    };

    match state.clients.dashboard.fetch_report(weather_url, wind_url).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            tracing::warn!(station = %key, error = %e, "weather report fetch failed");
            ApiError::new(
                req_id.0,
                "upstream_error",
                format!("failed to fetch weather pages for {}", station.name),
            )
            .into_response()
        }
    }
}
