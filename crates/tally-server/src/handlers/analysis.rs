//! Expense analysis handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::{get_user_id, AppError, AppState};
use tally_core::{AnalysisReport, ExpenseAnalyzer};

use super::transactions::DEFAULT_RECENT_LIMIT;

/// Query parameters for analysis
#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    /// Forecast horizon in days past the snapshot
    pub days_ahead: Option<u32>,
    /// Size of the recent-transaction window to analyze
    pub limit: Option<i64>,
}

/// GET /api/analysis - Run the analyzer over the recent window
///
/// Recomputed per request; the report is never cached server-side.
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalysisQuery>,
    headers: HeaderMap,
) -> Result<Json<AnalysisReport>, AppError> {
    let user_id = get_user_id(&state, &headers)?;
    let days_ahead = params.days_ahead.unwrap_or(30);
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, 1000);

    let transactions = state.db.list_recent_transactions(&user_id, limit)?;
    let report = ExpenseAnalyzer::new(transactions).report(days_ahead);

    Ok(Json(report))
}
