//! Notification handlers
//!
//! `POST /api/notifications/check` is the login-hook trigger: the UI calls
//! it right after sign-in, while the periodic scheduler covers the steady
//! state. Both paths go through the same dedup-checked store write, so
//! firing them concurrently cannot double-notify.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{get_user_id, AppError, AppState, SuccessResponse};
use tally_core::{BillNotificationScheduler, LogAlertSink, Notification};

/// Query parameters for listing notifications
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}

/// Result of a notification check run
#[derive(Serialize)]
pub struct CheckResponse {
    pub created: Vec<Notification>,
    pub deduped: usize,
    pub failed: usize,
}

/// GET /api/notifications - List notifications, newest first
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NotificationQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Notification>>, AppError> {
    let user_id = get_user_id(&state, &headers)?;
    let notifications = state.db.list_notifications(&user_id, params.unread_only)?;
    Ok(Json(notifications))
}

/// POST /api/notifications/check - Run the bill check for the signed-in user
pub async fn check_notifications(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CheckResponse>, AppError> {
    let user_id = get_user_id(&state, &headers)?;

    let sink = LogAlertSink;
    let scheduler = BillNotificationScheduler::new(&state.db).with_sink(&sink);
    let outcome = scheduler.run(&user_id, Utc::now())?;

    Ok(Json(CheckResponse {
        created: outcome.created,
        deduped: outcome.deduped,
        failed: outcome.failed,
    }))
}

/// POST /api/notifications/:id/read - Mark a notification as read
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = get_user_id(&state, &headers)?;
    state.db.mark_notification_read(&user_id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/notifications/:id/confirm - Confirm a notification
///
/// Marks it read and confirmed, and stamps the linked bill as acknowledged.
pub async fn confirm_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = get_user_id(&state, &headers)?;
    state.db.confirm_notification(&user_id, id, Utc::now())?;
    Ok(Json(SuccessResponse { success: true }))
}
