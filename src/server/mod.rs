// HTTP service
// Single-site extraction, bulk runs (JSON or CSV upload) and result downloads

mod error;
mod handlers;
mod middleware;
pub mod types;

pub use error::ApiError;
pub use handlers::{
    download, extract_bulk, extract_single, extract_upload, health_check, metrics_endpoint,
};
pub use middleware::{rate_limit_middleware, RateLimiter};
pub use types::{BulkRequest, BulkResponse, ExtractQuery, HealthResponse};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{ServerConfig, Settings};
use crate::crawl::Scraper;
use crate::metrics::Metrics;
use crate::report::ResultStore;

/// Shared state behind every handler
pub struct AppState {
    pub scraper: Scraper,
    pub store: ResultStore,
    pub metrics: Metrics,
    pub config: ServerConfig,
}

impl AppState {
    /// Wire the production state from settings. The scraper reports into
    /// the same metrics that /metrics exposes.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let metrics = Metrics::new().context("Failed to create metrics registry")?;
        let scraper = Scraper::from_config(&settings.scraper)
            .context("Failed to build HTTP client")?
            .with_metrics(metrics.clone());

        Ok(Self {
            scraper,
            store: ResultStore::new(&settings.output.results_dir),
            metrics,
            config: settings.server.clone(),
        })
    }
}

/// Build the router. Rate limiting is layered on when `limiter` is set.
pub fn create_router(state: Arc<AppState>, limiter: Option<RateLimiter>) -> Router {
    let max_body = state.config.max_body_bytes;

    let mut router = Router::new()
        .route("/extract", get(extract_single))
        .route("/extract/bulk", post(extract_bulk))
        .route("/extract/upload", post(extract_upload))
        .route("/download/:filename", get(download))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state);

    if let Some(limiter) = limiter {
        router = router.layer(axum::middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));
    }

    router
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C.
pub async fn serve(settings: &Settings) -> Result<()> {
    let addr = settings.bind_addr()?;
    let state = Arc::new(AppState::from_settings(settings)?);

    let limiter = RateLimiter::from_config(&settings.server);
    if let Some(limiter) = &limiter {
        limiter.spawn_purge_task();
        tracing::info!(
            rps = settings.server.requests_per_second,
            burst = settings.server.burst,
            "Rate limiting enabled"
        );
    }

    let app = create_router(state, limiter);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(
        "Starting harvest server on {} (results in {})",
        addr,
        settings.output.results_dir.display()
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
