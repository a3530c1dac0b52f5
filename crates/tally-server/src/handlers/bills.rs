//! Bill handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::{get_user_id, AppError, AppState, SuccessResponse};
use tally_core::models::{Bill, BillStatus, NewBill};

use super::transactions::CreatedResponse;

/// GET /api/bills - All bills, newest due date first
pub async fn list_bills(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Bill>>, AppError> {
    let user_id = get_user_id(&state, &headers)?;
    let bills = state.db.list_bills(&user_id)?;
    Ok(Json(bills))
}

/// POST /api/bills - Record a bill
pub async fn create_bill(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(new): Json<NewBill>,
) -> Result<Json<CreatedResponse>, AppError> {
    let user_id = get_user_id(&state, &headers)?;

    if new.title.trim().is_empty() {
        return Err(AppError::bad_request("Title is required"));
    }
    if new.amount < 0.0 {
        return Err(AppError::bad_request("Amount must be non-negative"));
    }

    let id = state.db.insert_bill(&user_id, &new)?;
    Ok(Json(CreatedResponse { id }))
}

/// Request body for a status change
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: BillStatus,
}

/// PUT /api/bills/:id/status - Update a bill's payment status
pub async fn set_bill_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = get_user_id(&state, &headers)?;
    state.db.set_bill_status(&user_id, id, update.status)?;
    Ok(Json(SuccessResponse { success: true }))
}
