use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use vientos_core::StationResult;
use vientos_sources::{collect_station, collect_stations};

use super::{find_station, AppState};
use crate::middleware::RequestId;

/// Combined wind report for every configured station. Always 200 once
/// aggregation completes; per-station failures live inside the body.
pub async fn combined_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    tracing::info!(request_id = %req_id.0, "collecting combined wind report");
    let report = collect_stations(&state.clients, &state.registry.stations).await;
    Json(report)
}

/// Wind report for a single station. The body is the station's own
/// result either way; a failed fetch surfaces as 500 with the failure
/// object, not an opaque error envelope.
pub async fn station_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let station = match find_station(&state, &key, &req_id) {
        Ok(station) => station,
        Err(e) => return e.into_response(),
    };

    let result = collect_station(&state.clients, station).await;
    let status = if matches!(result, StationResult::Err(_)) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    (status, Json(result)).into_response()
}
