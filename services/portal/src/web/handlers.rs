//! services/portal/src/web/handlers.rs
//!
//! Contains the Axum handlers of the development directory server and the
//! master definition for its OpenAPI specification.

use crate::web::{
    protocol::{ClearLogResponse, PasswordRequest, RecordVisitorRequest, VisitorEntryRecord},
    state::DirectoryState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::OpenApi;
use visitor_portal_core::ports::PortError;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        record_visitor_handler,
        notifications_handler,
        visitor_log_handler,
        clear_visitor_log_handler,
    ),
    components(
        schemas(RecordVisitorRequest, PasswordRequest, VisitorEntryRecord, ClearLogResponse)
    ),
    tags(
        (name = "Visitor Directory", description = "Append-only log of portal visits.")
    )
)]
pub struct ApiDoc;

fn internal(context: &str, e: PortError) -> (StatusCode, String) {
    error!("{}: {:?}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /visitors - Record a visit
#[utoipa::path(
    post,
    path = "/visitors",
    request_body = RecordVisitorRequest,
    responses(
        (status = 204, description = "Visit recorded"),
        (status = 400, description = "Empty username"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn record_visitor_handler(
    State(state): State<Arc<DirectoryState>>,
    Json(req): Json<RecordVisitorRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "username must not be empty".to_string()));
    }

    state.directory.log_visitor(username).await.map_err(|e| match e {
        PortError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
        other => internal("Failed to record visitor", other),
    })?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /notifications - The visitor log in arrival order
#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "Entries in arrival order", body = [VisitorEntryRecord]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn notifications_handler(
    State(state): State<Arc<DirectoryState>>,
) -> Result<Json<Vec<VisitorEntryRecord>>, (StatusCode, String)> {
    let entries = state
        .directory
        .get_notifications()
        .await
        .map_err(|e| internal("Failed to load notifications", e))?;

    Ok(Json(entries.into_iter().map(VisitorEntryRecord::from).collect()))
}

/// POST /visitor-log - The full log, or `null` for a wrong password
#[utoipa::path(
    post,
    path = "/visitor-log",
    request_body = PasswordRequest,
    responses(
        (status = 200, description = "Entries in arrival order, or null when the password is rejected", body = [VisitorEntryRecord]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn visitor_log_handler(
    State(state): State<Arc<DirectoryState>>,
    Json(req): Json<PasswordRequest>,
) -> Result<Json<Option<Vec<VisitorEntryRecord>>>, (StatusCode, String)> {
    let log = state
        .directory
        .get_visitor_log(&req.password)
        .await
        .map_err(|e| internal("Failed to load visitor log", e))?;

    if log.is_none() {
        warn!("Visitor log requested with a rejected password.");
    }
    Ok(Json(log.map(|entries| {
        entries.into_iter().map(VisitorEntryRecord::from).collect()
    })))
}

/// POST /visitor-log/clear - Delete every entry
#[utoipa::path(
    post,
    path = "/visitor-log/clear",
    request_body = PasswordRequest,
    responses(
        (status = 200, description = "Whether the log was cleared", body = ClearLogResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn clear_visitor_log_handler(
    State(state): State<Arc<DirectoryState>>,
    Json(req): Json<PasswordRequest>,
) -> Result<Json<ClearLogResponse>, (StatusCode, String)> {
    let cleared = state
        .directory
        .clear_visitor_log(&req.password)
        .await
        .map_err(|e| internal("Failed to clear visitor log", e))?;

    if !cleared {
        warn!("Visitor log clear requested with a rejected password.");
    }
    Ok(Json(ClearLogResponse { cleared }))
}
