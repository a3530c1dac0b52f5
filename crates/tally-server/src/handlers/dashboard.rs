//! Health and dashboard handlers

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;

use crate::{get_user_id, AppError, AppState};
use tally_core::DashboardStats;

/// GET /api/health - Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/dashboard - Summary counters for the signed-in user
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DashboardStats>, AppError> {
    let user_id = get_user_id(&state, &headers)?;
    let stats = state
        .db
        .dashboard_stats(&user_id, Utc::now().date_naive())?;
    Ok(Json(stats))
}
