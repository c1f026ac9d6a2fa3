// Route handlers

use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use super::error::ApiError;
use super::types::{BulkRequest, BulkResponse, ExtractQuery, HealthResponse};
use super::AppState;
use crate::crawl::SiteReport;
use crate::report::{check_upload_name, read_url_column};

/// Name of the multipart field carrying the CSV file
const UPLOAD_FIELD: &str = "file";

/// GET /extract?url=...
pub async fn extract_single(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExtractQuery>, QueryRejection>,
) -> Result<Json<SiteReport>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::unprocessable(e.body_text()))?;
    if query.url.trim().is_empty() {
        return Err(ApiError::unprocessable("url must not be empty"));
    }

    Ok(Json(state.scraper.scrape(query.url.trim()).await))
}

/// POST /extract/bulk
pub async fn extract_bulk(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BulkRequest>, JsonRejection>,
) -> Result<Json<BulkResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::new(e.status(), e.body_text()))?;
    run_bulk(&state, body.urls).await.map(Json)
}

/// POST /extract/upload (multipart, field "file")
pub async fn extract_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BulkResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        check_upload_name(field.file_name())?;
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        let urls = read_url_column(&bytes)?;
        tracing::info!(file = %filename, urls = urls.len(), "Accepted upload");
        return run_bulk(&state, urls).await.map(Json);
    }

    Err(ApiError::bad_request(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// Scrape, write the CSV off the async runtime, and point at the download.
async fn run_bulk(state: &AppState, urls: Vec<String>) -> Result<BulkResponse, ApiError> {
    let reports = state.scraper.scrape_many(urls).await;

    let store = state.store.clone();
    let filename = tokio::task::spawn_blocking(move || store.write(&reports))
        .await
        .map_err(|e| ApiError::internal(format!("Result writer failed: {e}")))??;

    Ok(BulkResponse::for_file(&filename))
}

/// GET /download/:filename
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let path = state.store.resolve(&filename).ok_or_else(ApiError::not_found)?;
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::warn!(file = %filename, error = %e, "Failed to read result file");
        ApiError::not_found()
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /metrics
pub async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let body = state.metrics.render()?;
    Ok((
        [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
        body,
    )
        .into_response())
}
