//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{get_user_id, AppError, AppState};
use tally_core::models::{NewTransaction, Transaction};

/// Default bounded window handed to the analyzer
pub const DEFAULT_RECENT_LIMIT: i64 = 50;

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// GET /api/transactions - Recent transactions, chronological
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let user_id = get_user_id(&state, &headers)?;
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, 1000);

    let transactions = state.db.list_recent_transactions(&user_id, limit)?;
    Ok(Json(transactions))
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(new): Json<NewTransaction>,
) -> Result<Json<CreatedResponse>, AppError> {
    let user_id = get_user_id(&state, &headers)?;

    if new.amount < 0.0 {
        return Err(AppError::bad_request("Amount must be non-negative"));
    }
    if new.category.trim().is_empty() {
        return Err(AppError::bad_request("Category is required"));
    }

    let id = state.db.insert_transaction(&user_id, &new)?;
    Ok(Json(CreatedResponse { id }))
}
