//! services/portal/src/web/state.rs
//!
//! Defines the shared state of the development directory server.

use std::sync::Arc;
use visitor_portal_core::ports::VisitorDirectory;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct DirectoryState {
    pub directory: Arc<dyn VisitorDirectory>,
}
