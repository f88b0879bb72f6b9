pub mod handlers;
pub mod protocol;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use handlers::ApiDoc;
pub use state::DirectoryState;

/// Builds the directory API router: the four visitor directory operations.
pub fn router(state: Arc<DirectoryState>) -> Router {
    Router::new()
        .route("/visitors", post(handlers::record_visitor_handler))
        .route("/notifications", get(handlers::notifications_handler))
        .route("/visitor-log", post(handlers::visitor_log_handler))
        .route("/visitor-log/clear", post(handlers::clear_visitor_log_handler))
        .with_state(state)
}
