use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use tracing::debug;

use super::path::UpstreamTarget;
use crate::error::AppError;

/// Headers copied from the inbound docs request onto the upstream fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardHeaders {
    pub accept: String,
    pub user_agent: String,
}

impl Default for ForwardHeaders {
    fn default() -> Self {
        Self {
            accept: "*/*".to_string(),
            user_agent: String::new(),
        }
    }
}

/// A fully buffered upstream reply.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issues one GET against the target. No retries.
    async fn get(
        &self,
        target: &UpstreamTarget,
        headers: &ForwardHeaders,
    ) -> Result<UpstreamResponse, AppError>;
}

pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get(
        &self,
        target: &UpstreamTarget,
        headers: &ForwardHeaders,
    ) -> Result<UpstreamResponse, AppError> {
        let url = target.url();
        debug!(url = %url, "Fetching documentation from upstream");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, headers.accept.as_str())
            .header(USER_AGENT, headers.user_agent.as_str())
            .send()
            .await
            .map_err(AppError::UpstreamUnreachable)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(AppError::UpstreamUnreachable)?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
