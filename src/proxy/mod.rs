use axum::{
    body::Body,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::AppError;

mod client;
pub mod forward;
pub mod path;
pub mod rewrite;
pub mod upstream;

pub use client::build_client;
pub use forward::ApiForwarder;
pub use path::{DocPath, UpstreamTarget};
pub use upstream::{ForwardHeaders, HttpUpstream, Upstream, UpstreamResponse};

const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// An inbound documentation request.
#[derive(Debug, Clone, Default)]
pub struct DocRequest {
    pub path: DocPath,
    pub headers: ForwardHeaders,
}

impl DocRequest {
    pub fn from_parts(path: DocPath, headers: &HeaderMap) -> Self {
        Self {
            path,
            headers: ForwardHeaders {
                accept: header_or(headers, header::ACCEPT, "*/*"),
                user_agent: header_or(headers, header::USER_AGENT, ""),
            },
        }
    }
}

fn header_or(headers: &HeaderMap, name: header::HeaderName, default: &str) -> String {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

impl IntoResponse for ProxiedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        match header::HeaderValue::from_str(&self.content_type) {
            Ok(value) => {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            Err(_) => warn!(content_type = %self.content_type, "Dropping unrepresentable content type"),
        }
        response
    }
}

/// Serves the upstream's interactive docs and OpenAPI schema below `/docs`.
#[derive(Clone)]
pub struct DocProxy {
    upstream: Arc<dyn Upstream>,
    base_url: String,
    public_api_url: String,
}

impl DocProxy {
    pub fn new(upstream: Arc<dyn Upstream>, base_url: &str, public_api_url: &str) -> Self {
        Self {
            upstream,
            base_url: base_url.trim_end_matches('/').to_string(),
            public_api_url: public_api_url.to_string(),
        }
    }

    /// Fetches and rewrites; every failure becomes a 500 plain text response.
    pub async fn handle(&self, request: DocRequest) -> Response {
        match self.forward(request).await {
            Ok(proxied) => proxied.into_response(),
            Err(e) => {
                error!(error = %e, "Error proxying to upstream docs");
                e.into_response()
            }
        }
    }

    pub async fn forward(&self, request: DocRequest) -> Result<ProxiedResponse, AppError> {
        let target = UpstreamTarget::new(&self.base_url, &request.path);
        info!(
            path = %target.path,
            schema = request.path.is_schema(),
            "Proxying documentation request"
        );

        let upstream = self.upstream.get(&target, &request.headers).await?;
        let content_type = upstream
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let body = self.rewrite_body(&request.path, &content_type, upstream.body);

        Ok(ProxiedResponse {
            status: upstream.status,
            content_type,
            body,
        })
    }

    /// JSON is only remounted for the exact `openapi.json` request. A path that
    /// merely starts with that segment, like `openapi.json/extra`, is passed
    /// through untouched.
    fn rewrite_body(&self, path: &DocPath, content_type: &str, body: Bytes) -> Bytes {
        if content_type.contains("text/html") {
            let html = String::from_utf8_lossy(&body);
            return Bytes::from(rewrite::rewrite_html(&html));
        }

        if content_type.contains("application/json") && path.is_schema() {
            return match rewrite::rewrite_schema(&body, &self.public_api_url) {
                Ok(rewritten) => Bytes::from(rewritten),
                Err(e) => {
                    warn!(error = %e, "Error modifying OpenAPI schema, serving it unchanged");
                    body
                }
            };
        }

        body
    }
}
