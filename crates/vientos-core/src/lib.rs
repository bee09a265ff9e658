pub mod app_config;
pub mod config;
pub mod stations;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use stations::{load_stations, SourceSpec, StationConfig, StationRegistry};
pub use types::{CombinedReport, StationFailure, StationRecord, StationResult};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read stations file {path}: {source}")]
    StationsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stations file: {0}")]
    StationsFileParse(#[from] serde_yaml::Error),

    #[error("invalid stations config: {0}")]
    Validation(String),
}
