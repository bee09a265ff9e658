//! Integration tests for the multi-source aggregator.
//!
//! Uses `wiremock` to stand up a local HTTP server per test so no real
//! network traffic is made. One mock server plays both upstreams: the
//! JSON telemetry API (path per station id) and the HTML dashboard
//! pages (fixed page paths).

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vientos_core::{SourceSpec, StationConfig, StationResult};
use vientos_sources::{collect_station, collect_stations, SourceClients, TelemetryClient};

const WIND_PAGE: &str = r#"
    <div class="variable">
      <span class="nombre">Viento</span>
      <table class="valores">
        <tr><td>Velocidad actual</td><td>23,4 km/h</td></tr>
        <tr><td>Direcci&oacute;n</td><td>NE</td></tr>
        <tr><td>Promedio 10 min</td><td>18 km/h</td></tr>
        <tr><td>Racha m&aacute;xima</td><td>41 km/h</td></tr>
      </table>
    </div>
"#;

const WEATHER_PAGE: &str = r#"
    <div class="variable">
      <span class="nombre">Temperatura</span>
      <table class="tabla"><tr><td class="actual">12,3 &deg;C</td></tr></table>
    </div>
"#;

fn bernal_payload() -> serde_json::Value {
    json!({
        "estacion": "X1",
        "fechaMedicion": "2024-01-01T00:00:00Z",
        "variables": {
            "VelocidadViento": [5, 8],
            "RafagaViento": [12],
            "DireccionViento": ["NE"]
        }
    })
}

fn test_clients(server: &MockServer) -> SourceClients {
    SourceClients {
        telemetry: TelemetryClient::new(&server.uri(), 5, "vientos-test/0.1")
            .expect("failed to build test TelemetryClient"),
        dashboard: vientos_sources::DashboardClient::new(5, "vientos-test/0.1")
            .expect("failed to build test DashboardClient"),
    }
}

fn telemetry_station(key: &str, name: &str, station_id: &str) -> StationConfig {
    StationConfig {
        key: key.to_string(),
        name: name.to_string(),
        source: SourceSpec::Telemetry {
            station_id: station_id.to_string(),
        },
    }
}

fn dashboard_station(server: &MockServer) -> StationConfig {
    StationConfig {
        key: "unlp".to_string(),
        name: "UNLP".to_string(),
        source: SourceSpec::Dashboard {
            weather_url: format!("{}/campo.htm", server.uri()),
            wind_url: format!("{}/torre.htm", server.uri()),
        },
    }
}

async fn mount_dashboard_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/campo.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WEATHER_PAGE))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/torre.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WIND_PAGE))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// End-to-end telemetry normalization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn telemetry_station_normalizes_latest_readings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/X1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&bernal_payload()))
        .mount(&server)
        .await;

    let clients = test_clients(&server);
    let station = telemetry_station("bernal", "Bernal", "X1");
    let result = collect_station(&clients, &station).await;

    let StationResult::Ok(record) = result else {
        panic!("expected Ok record, got: {result:?}");
    };
    assert_eq!(record.station_name, "Bernal");
    assert_eq!(record.external_id.as_deref(), Some("X1"));
    assert_eq!(record.measured_at, "2024-01-01T00:00:00Z");
    assert_eq!(record.wind_speed, Some(8.0));
    assert_eq!(record.wind_gust, Some(12.0));
    assert_eq!(record.wind_direction.as_deref(), Some("NE"));
}

// ---------------------------------------------------------------------------
// Completeness: N stations in, N entries out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn combined_report_has_one_entry_per_station_even_when_all_fail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let clients = test_clients(&server);
    let stations = vec![
        telemetry_station("bernal", "Bernal", "X1"),
        telemetry_station("berazategui", "Berazategui", "X2"),
        dashboard_station(&server),
    ];

    let report = collect_stations(&clients, &stations).await;

    assert_eq!(report.len(), 3, "one entry per configured station");
    for key in ["bernal", "berazategui", "unlp"] {
        let entry = report.get(key).unwrap_or_else(|| panic!("missing key {key}"));
        assert!(entry.is_err(), "expected failure entry for {key}");
    }
}

// ---------------------------------------------------------------------------
// Isolation: one station's failure leaves the siblings intact
// ---------------------------------------------------------------------------

#[tokio::test]
async fn one_station_failing_does_not_disturb_the_others() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/X1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&bernal_payload()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/X2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_dashboard_pages(&server).await;

    let clients = test_clients(&server);
    let stations = vec![
        telemetry_station("bernal", "Bernal", "X1"),
        telemetry_station("berazategui", "Berazategui", "X2"),
        dashboard_station(&server),
    ];

    let report = collect_stations(&clients, &stations).await;
    assert_eq!(report.len(), 3);

    let StationResult::Ok(bernal) = &report["bernal"] else {
        panic!("expected Bernal to succeed: {:?}", report["bernal"]);
    };
    assert_eq!(bernal.wind_speed, Some(8.0));

    let StationResult::Err(failure) = &report["berazategui"] else {
        panic!("expected Berazategui to fail");
    };
    assert_eq!(failure.station_name, "Berazategui");
    assert!(
        failure.error.contains("503") || failure.error.contains("500"),
        "failure message should carry the upstream status: {}",
        failure.error
    );

    let StationResult::Ok(unlp) = &report["unlp"] else {
        panic!("expected UNLP to succeed: {:?}", report["unlp"]);
    };
    assert_eq!(unlp.wind_speed, Some(23.4));
    assert_eq!(unlp.wind_gust, Some(41.0));
    assert_eq!(unlp.external_id, None);
}

// ---------------------------------------------------------------------------
// Shape validation failures stay per-station
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_payload_fails_only_its_own_station() {
    let server = MockServer::start().await;

    // X1 payload is missing `variables`.
    Mock::given(method("GET"))
        .and(path("/X1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "estacion": "X1",
            "fechaMedicion": "2024-01-01T00:00:00Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/X2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "estacion": "X2",
            "fechaMedicion": "2024-01-02T00:00:00Z",
            "variables": { "VelocidadViento": [3.5] }
        })))
        .mount(&server)
        .await;

    let clients = test_clients(&server);
    let stations = vec![
        telemetry_station("bernal", "Bernal", "X1"),
        telemetry_station("berazategui", "Berazategui", "X2"),
    ];

    let report = collect_stations(&clients, &stations).await;

    let StationResult::Err(failure) = &report["bernal"] else {
        panic!("expected shape failure for Bernal");
    };
    assert_eq!(failure.error, "incomplete or unexpected payload shape");

    let StationResult::Ok(record) = &report["berazategui"] else {
        panic!("expected Berazategui to succeed");
    };
    assert_eq!(record.wind_speed, Some(3.5));
    assert_eq!(record.wind_gust, None, "absent series key must be null");
}

#[tokio::test]
async fn non_json_body_fails_the_station() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/X1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let clients = test_clients(&server);
    let station = telemetry_station("bernal", "Bernal", "X1");
    let result = collect_station(&clients, &station).await;

    assert!(result.is_err(), "expected failure, got: {result:?}");
}

// ---------------------------------------------------------------------------
// Dashboard station: both pages required
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_station_fails_when_wind_page_is_down() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/campo.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WEATHER_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/torre.htm"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let clients = test_clients(&server);
    let result = collect_station(&clients, &dashboard_station(&server)).await;

    let StationResult::Err(failure) = result else {
        panic!("expected failure when the wind page is down, got: {result:?}");
    };
    assert!(
        failure.error.contains("wind"),
        "failure should name the wind page: {}",
        failure.error
    );
}

#[tokio::test]
async fn dashboard_station_fails_when_weather_page_is_down() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/campo.htm"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/torre.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WIND_PAGE))
        .mount(&server)
        .await;

    let clients = test_clients(&server);
    let result = collect_station(&clients, &dashboard_station(&server)).await;

    assert!(
        result.is_err(),
        "a dashboard station with only its wind page up is still down: {result:?}"
    );
}

#[tokio::test]
async fn dashboard_station_with_missing_wind_table_yields_null_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/campo.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WEATHER_PAGE))
        .mount(&server)
        .await;
    // Page is up but the wind block is gone — extraction miss, not an error.
    Mock::given(method("GET"))
        .and(path("/torre.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let clients = test_clients(&server);
    let result = collect_station(&clients, &dashboard_station(&server)).await;

    let StationResult::Ok(record) = result else {
        panic!("expected Ok record with null fields, got: {result:?}");
    };
    assert_eq!(record.wind_speed, None);
    assert_eq!(record.wind_gust, None);
    assert_eq!(record.wind_direction, None);
}

// ---------------------------------------------------------------------------
// Idempotence: identical upstream responses, identical records
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sequential_calls_with_identical_upstreams_are_idempotent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/X1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&bernal_payload()))
        .mount(&server)
        .await;
    mount_dashboard_pages(&server).await;

    let clients = test_clients(&server);
    let stations = vec![
        telemetry_station("bernal", "Bernal", "X1"),
        dashboard_station(&server),
    ];

    let first = collect_stations(&clients, &stations).await;
    let second = collect_stations(&clients, &stations).await;

    assert_eq!(
        first["bernal"], second["bernal"],
        "telemetry records must be byte-identical across calls"
    );

    let (StationResult::Ok(a), StationResult::Ok(b)) = (&first["unlp"], &second["unlp"]) else {
        panic!("expected UNLP to succeed in both calls");
    };
    // Everything but the generated fetch timestamp must match.
    assert_eq!(a.wind_speed, b.wind_speed);
    assert_eq!(a.wind_gust, b.wind_gust);
    assert_eq!(a.wind_direction, b.wind_direction);
    assert_eq!(a.external_id, b.external_id);
}
