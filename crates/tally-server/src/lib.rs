//! Tally Web Server
//!
//! Axum-based REST API for the Tally personal finance tracker.
//!
//! Identity comes from the `x-auth-user-id` header, populated by the
//! external identity provider (a reverse proxy or auth gateway). The server
//! never authenticates users itself; with `require_auth` disabled, requests
//! without the header fall back to a shared local user for development.

use std::sync::Arc;

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use tally_core::Database;

mod handlers;
mod scheduler;


pub use scheduler::{start_notification_scheduler, NotifyScheduleConfig};

/// Header carrying the authenticated user id, set by the identity provider
pub const AUTH_USER_HEADER: &str = "x-auth-user-id";

/// User id used when authentication is disabled for local development
const LOCAL_USER: &str = "local";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether an authenticated user header is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// API error with a sanitized message
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<tally_core::Error> for AppError {
    fn from(e: tally_core::Error) -> Self {
        match e {
            tally_core::Error::NotFound(what) => Self {
                status: StatusCode::NOT_FOUND,
                message: format!("Not found: {}", what),
            },
            tally_core::Error::InvalidData(msg) => Self::bad_request(msg),
            other => {
                // Internal details go to the log, not the response
                warn!(error = %other, "Request failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal error".to_string(),
                }
            }
        }
    }
}

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Resolve the requesting user from headers
pub(crate) fn get_user_id(state: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    match headers.get(AUTH_USER_HEADER).and_then(|v| v.to_str().ok()) {
        Some(user) if !user.is_empty() => Ok(user.to_string()),
        _ if state.config.require_auth => Err(AppError::unauthorized(format!(
            "Missing {} header",
            AUTH_USER_HEADER
        ))),
        _ => Ok(LOCAL_USER.to_string()),
    }
}

/// Build the API router
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    let cors = if config.allowed_origins.is_empty() {
        // Same-origin only
        CorsLayer::new()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    };

    let state = Arc::new(AppState { db, config });

    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/api/bills",
            get(handlers::list_bills).post(handlers::create_bill),
        )
        .route("/api/bills/:id/status", put(handlers::set_bill_status))
        .route("/api/analysis", get(handlers::get_analysis))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/notifications", get(handlers::list_notifications))
        .route(
            "/api/notifications/check",
            post(handlers::check_notifications),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::mark_notification_read),
        )
        .route(
            "/api/notifications/:id/confirm",
            post(handlers::confirm_notification),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the server until shutdown
pub async fn serve(db: Database, host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    if let Some(schedule) = NotifyScheduleConfig::from_env() {
        start_notification_scheduler(db.clone(), schedule);
    }

    let app = create_router(db, config);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Tally server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
