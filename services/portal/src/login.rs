//! services/portal/src/login.rs
//!
//! The login page and its submission flow.
//!
//! A login writes the username to the session before anything touches the
//! network, fires the "record visitor" call in the background, and always
//! lands on the first protected route. Recording is best effort: a failure is
//! logged and nothing else.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use visitor_portal_core::domain::Route;
use visitor_portal_core::ports::VisitorDirectory;

use crate::session::SessionContext;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("Please enter your username to continue.")]
    EmptyUsername,
}

/// The accepted login: where to go next, plus the background recording task.
#[derive(Debug)]
pub struct LoginSubmission {
    pub username: String,
    pub destination: Route,
    recording: JoinHandle<()>,
}

impl LoginSubmission {
    /// Waits for the background "record visitor" call to settle. Navigation
    /// never depends on this.
    pub async fn recorded(self) {
        if let Err(e) = self.recording.await {
            warn!("Visitor recording task ended abnormally: {}", e);
        }
    }
}

#[derive(Clone)]
pub struct LoginFlow {
    session: SessionContext,
    directory: Arc<dyn VisitorDirectory>,
}

impl LoginFlow {
    pub fn new(session: SessionContext, directory: Arc<dyn VisitorDirectory>) -> Self {
        Self { session, directory }
    }

    /// Validates and accepts a login. Must be called from within a Tokio runtime.
    pub fn submit(&self, raw_username: &str) -> Result<LoginSubmission, LoginError> {
        let username = raw_username.trim();
        if username.is_empty() {
            return Err(LoginError::EmptyUsername);
        }

        self.session.set_username(username);
        let recording = tokio::spawn(record_visitor(self.directory.clone(), username.to_string()));
        info!("Visitor '{}' logged in.", username);

        Ok(LoginSubmission {
            username: username.to_string(),
            destination: Route::LANDING,
            recording,
        })
    }
}

async fn record_visitor(directory: Arc<dyn VisitorDirectory>, username: String) {
    match directory.log_visitor(&username).await {
        Ok(()) => info!("Recorded visit for '{}'.", username),
        Err(e) => warn!("Could not record visit for '{}': {}", username, e),
    }
}

//=========================================================================================
// LoginPage (form state)
//=========================================================================================

/// Form state of the login route: the current input and the inline error.
pub struct LoginPage {
    flow: LoginFlow,
    input: String,
    error: Option<LoginError>,
}

impl LoginPage {
    pub fn new(flow: LoginFlow) -> Self {
        Self {
            flow,
            input: String::new(),
            error: None,
        }
    }

    /// Replaces the input; any inline error goes away with the change.
    pub fn on_input(&mut self, value: &str) {
        self.input = value.to_string();
        self.error = None;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&LoginError> {
        self.error.as_ref()
    }

    pub fn submit(&mut self) -> Result<LoginSubmission, LoginError> {
        let result = self.flow.submit(&self.input);
        self.error = result.as_ref().err().cloned();
        result
    }
}
