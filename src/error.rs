use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::io;

/// Body returned when the documentation upstream cannot be fetched.
pub const DOCS_FETCH_FAILED: &str = "Error fetching OpenAPI docs";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch documentation from upstream: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),

    #[error("Request to upstream API failed: {0}")]
    ForwardFailed(#[source] reqwest::Error),

    #[error("OpenAPI schema could not be decoded: {0}")]
    SchemaParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to read request body: {0}")]
    BodyRead(#[from] axum::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // The docs route answers with plain text so the docs UI shows a readable message.
        if matches!(self, AppError::UpstreamUnreachable(_)) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                DOCS_FETCH_FAILED,
            )
                .into_response();
        }

        let (status, error_message) = match &self {
            AppError::ForwardFailed(e) => (
                StatusCode::BAD_GATEWAY,
                format!("Upstream request failed: {}", e),
            ),
            AppError::BodyRead(e) => (
                StatusCode::BAD_REQUEST,
                format!("Failed to read request body: {}", e),
            ),
            AppError::IoError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", e),
            ),
            AppError::SchemaParse(_) | AppError::InvalidConfig(_) | AppError::UpstreamUnreachable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": self.kind(),
            }
        }));

        (status, body).into_response()
    }
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::UpstreamUnreachable(_) => "upstream_unreachable",
            AppError::ForwardFailed(_) => "forward_failed",
            AppError::SchemaParse(_) => "schema_parse",
            AppError::IoError(_) => "io",
            AppError::BodyRead(_) => "body_read",
            AppError::InvalidConfig(_) => "invalid_config",
        }
    }
}
