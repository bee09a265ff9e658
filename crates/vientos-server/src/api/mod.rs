mod weather;
mod wind;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use vientos_core::StationRegistry;
use vientos_sources::SourceClients;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<StationRegistry>,
    pub clients: Arc<SourceClients>,
}

/// Error envelope. Success bodies are the raw report shapes; only
/// errors carry the envelope with request metadata.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/wind", get(wind::combined_report))
        .route("/api/v1/wind/{key}", get(wind::station_report))
        .route("/api/v1/weather/{key}", get(weather::station_weather))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    tracing::debug!(request_id = %req_id.0, "health check");
    (StatusCode::OK, Json(HealthData { status: "ok" }))
}

/// Looks up a station by key, producing a ready-made 404 on a miss.
pub(super) fn find_station<'a>(
    state: &'a AppState,
    key: &str,
    request_id: &RequestId,
) -> Result<&'a vientos_core::StationConfig, ApiError> {
    state.registry.find(key).ok_or_else(|| {
        ApiError::new(
            request_id.0.clone(),
            "not_found",
            format!("unknown station: {key}"),
        )
    })
}
