use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub stations_path: PathBuf,
    pub telemetry_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}
