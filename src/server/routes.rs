//! Route handlers.

use crate::catalog::Category;
use crate::dashboard::{CategoryPanel, Dashboard, DashboardView, DatasetStatus};
use crate::models::{CountylensError, Result};
use axum::{
    Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Clone)]
struct AppState {
    dashboard: Arc<Dashboard>,
    /// Boundary document serialized once; the dataset never changes.
    boundaries: Bytes,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ViewParams {
    #[serde(default)]
    pub indicator: Option<String>,
}

/// Build the API router over a shared dashboard.
pub fn router(dashboard: Arc<Dashboard>) -> Result<Router> {
    let boundaries_json = serde_json::to_vec(dashboard.dataset().boundaries())
        .map_err(|e| CountylensError::Internal(format!("serializing boundary document: {e}")))?;
    let state = AppState {
        dashboard,
        boundaries: Bytes::from(boundaries_json),
    };

    let router = Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/catalog", get(catalog))
        .route("/api/categories/:name", get(category))
        .route("/api/boundaries", get(boundaries))
        .route("/api/view", get(view))
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    Ok(router)
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/status
async fn status(State(state): State<AppState>) -> Json<DatasetStatus> {
    Json(state.dashboard.dataset().status().clone())
}

/// GET /api/catalog
async fn catalog(State(state): State<AppState>) -> Json<&'static [Category]> {
    Json(state.dashboard.catalog())
}

/// GET /api/categories/:name
async fn category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<CategoryPanel> {
    Json(state.dashboard.select_category(&name))
}

/// GET /api/boundaries
async fn boundaries(State(state): State<AppState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], state.boundaries)
}

/// GET /api/view?indicator=...
async fn view(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Json<DashboardView> {
    Json(state.dashboard.select_indicator(params.indicator.as_deref()))
}
