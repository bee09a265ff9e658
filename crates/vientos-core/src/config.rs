use crate::app_config::AppConfig;
use crate::ConfigError;

/// Default base URL of the JSON telemetry API (historic per-station variables).
pub const DEFAULT_TELEMETRY_BASE_URL: &str =
    "https://www.aysa.com.ar/api/estaciones/getVariablesEstacionesHistorico";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if env var values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if env var values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let bind_addr = parse_addr("VIENTOS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VIENTOS_LOG_LEVEL", "info");
    let stations_path = PathBuf::from(or_default("VIENTOS_STATIONS_PATH", "./config/stations.yaml"));
    let telemetry_base_url = or_default("VIENTOS_TELEMETRY_BASE_URL", DEFAULT_TELEMETRY_BASE_URL);
    let request_timeout_secs = parse_u64("VIENTOS_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("VIENTOS_USER_AGENT", "vientos/0.1 (wind-aggregator)");

    Ok(AppConfig {
        bind_addr,
        log_level,
        stations_path,
        telemetry_base_url,
        request_timeout_secs,
        user_agent,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
