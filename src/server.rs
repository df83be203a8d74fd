use axum::{
    http::{HeaderName, HeaderValue},
    middleware::from_fn,
    routing::{any, get},
    Router,
};
use std::{sync::Arc, time::Instant};
use tokio::net::TcpListener;
use tower_http::{compression::CompressionLayer, set_header::SetResponseHeaderLayer};
use tracing::{debug, info};

use crate::{
    config::AppConfig,
    error::AppError,
    handlers,
    proxy::{build_client, ApiForwarder, DocProxy, HttpUpstream},
    telemetry::request_logging,
};

pub struct AppState {
    pub config: AppConfig,
    pub docs: DocProxy,
    pub api: ApiForwarder,
    pub started: Instant,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let client = build_client(&config)?;
        let docs = DocProxy::new(
            Arc::new(HttpUpstream::new(client.clone())),
            &config.api_url,
            &config.public_api_url,
        );
        let api = ApiForwarder::new(client, &config.api_url);

        Ok(Self {
            config,
            docs,
            api,
            started: Instant::now(),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    debug!("Creating application router");
    Router::new()
        .route("/docs", get(handlers::docs_root))
        .route("/docs/*path", get(handlers::docs_path))
        .route("/api/health", get(handlers::health_check))
        .route("/api/bi/*path", any(handlers::forward_api))
        .fallback(handlers::fallback)
        .with_state(state)
        .layer(from_fn(request_logging))
        .layer(CompressionLayer::new())
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-dns-prefetch-control"),
            HeaderValue::from_static("on"),
        ))
}

/// Serves the router on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<(), AppError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(
        "Docs gateway listening on {} (upstream {})",
        addr, state.config.api_url
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
