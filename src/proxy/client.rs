use crate::{config::AppConfig, error::AppError};
use std::time::Duration;

/// Pooled upstream client shared by the docs proxy and the API forwarder.
pub fn build_client(config: &AppConfig) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(32)
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(config.upstream_timeout)
        .build()
        .map_err(|e| AppError::InvalidConfig(format!("failed to build HTTP client: {}", e)))
}
