//! HTTP route definitions

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use std::time::Instant;

use serde::Serialize;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{debug, error, warn};

use crate::app::AppState;
use crate::qr::{self, QrError};
use crate::store::{Product, SortKey, StoreError};
use crate::view;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.request_timeout;

    Router::new()
        .route("/", get(index_handler))
        .route("/api/products", get(products_json_handler))
        .route("/products/:id/qr.png", get(qr_png_handler))
        .route("/health", get(health_handler))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Sort key from the `sort_by` query parameter; the first occurrence wins
fn requested_sort_key(params: &[(String, String)]) -> SortKey {
    params
        .iter()
        .find(|(name, _)| name == "sort_by")
        .map(|(_, value)| SortKey::parse_lenient(value))
        .unwrap_or_default()
}

// ============================================================================
// Product page
// ============================================================================

async fn index_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let started = Instant::now();
    let sort_key = requested_sort_key(&params);

    let products = state.products.list_products(sort_key).await?;
    let page = view::render_page(sort_key, &products)?;

    debug!(
        sort_by = sort_key.column(),
        products = products.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Rendered product page"
    );

    Ok(Html(page))
}

// ============================================================================
// JSON and image endpoints
// ============================================================================

async fn products_json_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.products.list_products(requested_sort_key(&params)).await?;
    Ok(Json(products))
}

async fn qr_png_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let product = state
        .products
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

    let png = qr::encode_product(&product)?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    database: &'static str,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, database) = match state.products.ping().await {
        Ok(()) => ("ok", "ok"),
        Err(e) => {
            warn!("Health check could not reach database: {}", e);
            ("degraded", "unavailable")
        }
    };

    Json(HealthResponse {
        status,
        uptime_secs: state.started_at.elapsed().as_secs(),
        database,
    })
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        error!("Store failure: {}", e);
        AppError::Internal(e.to_string())
    }
}

impl From<QrError> for AppError {
    fn from(e: QrError) -> Self {
        error!("QR generation failure: {}", e);
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
