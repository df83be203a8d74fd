use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, HeaderName, Request, Response},
};
use futures_util::TryStreamExt;
use tracing::{debug, info};

use crate::error::AppError;

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP_HEADERS: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Forwards `/api/bi/*` traffic to the backend's `/bi/*` tree unchanged.
#[derive(Clone)]
pub struct ApiForwarder {
    client: reqwest::Client,
    base_url: String,
}

impl ApiForwarder {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Backend URL for the path captured after `/api/bi/`.
    pub fn target_url(&self, rest: &str, query: Option<&str>) -> String {
        let query = query.map(|q| format!("?{}", q)).unwrap_or_default();
        format!("{}/bi/{}{}", self.base_url, rest.trim_start_matches('/'), query)
    }

    pub async fn forward(&self, rest: &str, request: Request<Body>) -> Result<Response<Body>, AppError> {
        let (parts, body) = request.into_parts();
        let url = self.target_url(rest, parts.uri.query());
        info!(method = %parts.method, url = %url, "Forwarding API request");

        let headers = parts
            .headers
            .iter()
            .filter(|(name, _)| !is_hop_by_hop(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect::<HeaderMap>();

        let body = to_bytes(body, usize::MAX).await?;

        let response = self
            .client
            .request(parts.method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(AppError::ForwardFailed)?;

        debug!(status = %response.status(), "Upstream API responded");

        let mut builder = Response::builder().status(response.status());
        for (name, value) in response.headers() {
            if !is_hop_by_hop(name) {
                builder = builder.header(name, value);
            }
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));

        builder
            .body(Body::from_stream(stream))
            .map_err(|e| AppError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }
}
