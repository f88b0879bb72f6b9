//! crates/visitor_portal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the portal's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! core independent of the concrete visitor directory and session storage.

use async_trait::async_trait;
use crate::domain::VisitorEntry;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The remote, append-only log of recorded visits.
#[async_trait]
pub trait VisitorDirectory: Send + Sync {
    /// Records one visit. The directory assigns the timestamp.
    async fn log_visitor(&self, username: &str) -> PortResult<()>;

    /// Returns the log in arrival order. Never signals "wrong password".
    async fn get_notifications(&self) -> PortResult<Vec<VisitorEntry>>;

    /// Returns the full log, or `None` when the password is rejected or no
    /// data is available. `None` is not the same as an empty log.
    async fn get_visitor_log(&self, password: &str) -> PortResult<Option<Vec<VisitorEntry>>>;

    /// Deletes every entry at once. Returns whether the clear happened.
    async fn clear_visitor_log(&self, password: &str) -> PortResult<bool>;
}

/// Tab-scoped string storage backing the session flags.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}
