use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::{
    proxy::{DocPath, DocRequest},
    server::AppState,
};

pub const SERVICE_NAME: &str = "BI Docs Gateway";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub uptime: f64,
    pub timestamp: String,
    pub service: &'static str,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy",
        uptime: state.started.elapsed().as_secs_f64(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        service: SERVICE_NAME,
    })
}

pub async fn docs_root(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let request = DocRequest::from_parts(DocPath::default(), &headers);
    state.docs.handle(request).await
}

pub async fn docs_path(
    State(state): State<Arc<AppState>>,
    Path(tail): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let request = DocRequest::from_parts(DocPath::parse(&tail), &headers);
    state.docs.handle(request).await
}

/// Sends `/docs/` to `/docs`; anything else unrouted is a 404.
pub async fn fallback(uri: Uri) -> Response {
    if uri.path() == "/docs/" {
        return Redirect::permanent("/docs").into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

pub async fn forward_api(
    State(state): State<Arc<AppState>>,
    Path(rest): Path<String>,
    request: Request<Body>,
) -> impl IntoResponse {
    match state.api.forward(&rest, request).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            error!("API forward error: {}", e);
            e.into_response()
        }
    }
}
