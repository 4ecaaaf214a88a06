//! HTTP handlers for the dashboard
//!
//! - GET /api/dashboard             - overview
//! - GET /api/dashboard/suggestions - rule-based suggestions

use crate::api::{method_not_allowed, ApiResult};
use crate::dashboard::{build_dashboard, build_suggestions};
use crate::inventory::InventoryStore;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;

/// Shared state for dashboard handlers
#[derive(Clone)]
pub struct DashboardState {
    pub store: Arc<InventoryStore>,
}

/// Create the dashboard router
pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route(
            "/api/dashboard",
            get(get_dashboard).fallback(method_not_allowed),
        )
        .route(
            "/api/dashboard/suggestions",
            get(get_suggestions).fallback(method_not_allowed),
        )
        .with_state(state)
}

/// GET /api/dashboard
async fn get_dashboard(State(state): State<DashboardState>) -> ApiResult<impl IntoResponse> {
    let items = state.store.list_items().await?;
    let categories = state.store.list_category_summaries().await?;
    Ok(Json(build_dashboard(
        &items,
        categories,
        &state.store.thresholds(),
    )))
}

/// GET /api/dashboard/suggestions
async fn get_suggestions(State(state): State<DashboardState>) -> ApiResult<impl IntoResponse> {
    let items = state.store.list_items().await?;
    Ok(Json(build_suggestions(&items, &state.store.thresholds())))
}
