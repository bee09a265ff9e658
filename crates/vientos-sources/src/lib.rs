pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod telemetry;

pub use aggregate::{collect_station, collect_stations, SourceClients};
pub use dashboard::{DashboardClient, WeatherReport, WindReading};
pub use error::SourceError;
pub use telemetry::{normalize_telemetry, TelemetryClient};
