use std::{env, time::Duration};
use dotenv::dotenv;

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_PUBLIC_API_URL: &str = "https://data.porenta.us";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Process-wide settings, read once at startup and handed to the router as state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub host: String,
    /// Base URL of the backend serving `/docs`, `/openapi.json` and `/bi/*`.
    pub api_url: String,
    /// Public URL written into the `servers` list of the rewritten schema.
    pub public_api_url: String,
    pub upstream_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn new() -> Result<Self, AppError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::InvalidConfig(format!("PORT must be a number, got {:?}", raw)))?,
            None => 3000,
        };

        let api_url = normalize_base_url(
            "API_URL",
            lookup("API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let timeout_secs: u64 = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| {
                AppError::InvalidConfig(format!(
                    "UPSTREAM_TIMEOUT_SECS must be a number of seconds, got {:?}",
                    raw
                ))
            })?,
            None => 30,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("compact") => LogFormat::Compact,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::InvalidConfig(format!(
                    "LOG_FORMAT must be 'compact' or 'json', got {:?}",
                    other
                )))
            }
        };

        Ok(Self {
            port,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            api_url,
            public_api_url: lookup("PUBLIC_API_URL")
                .unwrap_or_else(|| DEFAULT_PUBLIC_API_URL.to_string()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            log_format,
        })
    }
}

fn normalize_base_url(name: &str, raw: String) -> Result<String, AppError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AppError::InvalidConfig(format!(
            "{} must be an http(s) URL, got {:?}",
            name, raw
        )));
    }
    Ok(trimmed.to_string())
}
