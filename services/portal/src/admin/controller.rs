//! services/portal/src/admin/controller.rs
//!
//! The visitor log admin workflow: password gate, log retrieval, log clearing.
//!
//! The password is checked locally against the shared secret. Once accepted it
//! is only used as the capability passed to the directory's log operations.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info, warn};
use visitor_portal_core::domain::VisitorEntry;
use visitor_portal_core::ports::{PortError, VisitorDirectory};

use super::notifications::NotificationFeed;
use super::{format_timestamp, ADMIN_PASSWORD};

//=========================================================================================
// States and Errors
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    /// The password matched; the first log fetch has not settled yet.
    Authenticating,
    Authenticated,
}

/// One displayed row of the visitor log. `badge` counts down from the log
/// length, so the newest entry carries the highest number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub badge: usize,
    pub username: String,
    pub timestamp: u64,
    pub display_time: String,
}

/// Every state the visitor log query can be in. None of them collapse into
/// another: an empty log is not an error and not "still loading".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogState {
    NotRequested,
    Loading,
    Failed(String),
    Empty,
    Loaded(Vec<LogRow>),
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Please enter the admin password.")]
    EmptyPassword,
    #[error("Incorrect password. Access denied.")]
    IncorrectPassword,
    #[error("Enter the admin password first.")]
    NotAuthenticated,
    #[error("Invalid password or no data returned")]
    LogUnavailable,
    #[error("The directory refused to clear the visitor log.")]
    ClearRejected,
    #[error("A newer visitor log request replaced this one.")]
    Superseded,
    #[error("Visitor directory error: {0}")]
    Port(#[from] PortError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    /// Nothing to clear, or a clear is already running.
    Skipped,
}

struct AdminState {
    auth: AuthState,
    accepted_password: Option<String>,
    auth_error: Option<String>,
    log: LogState,
    /// Bumped by every password submission and every log fetch. A fetch only
    /// publishes its result if nothing bumped it in the meantime.
    log_generation: u64,
    clear_pending: bool,
    clear_error: Option<String>,
}

//=========================================================================================
// AdminController
//=========================================================================================

/// Cheap to clone; clones drive the same workflow.
#[derive(Clone)]
pub struct AdminController {
    directory: Arc<dyn VisitorDirectory>,
    feed: Arc<NotificationFeed>,
    state: Arc<Mutex<AdminState>>,
}

impl AdminController {
    pub fn new(directory: Arc<dyn VisitorDirectory>, feed: Arc<NotificationFeed>) -> Self {
        Self {
            directory,
            feed,
            state: Arc::new(Mutex::new(AdminState {
                auth: AuthState::Unauthenticated,
                accepted_password: None,
                auth_error: None,
                log: LogState::NotRequested,
                log_generation: 0,
                clear_pending: false,
                clear_error: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AdminState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // --- Snapshot accessors for the renderer ---

    pub fn auth_state(&self) -> AuthState {
        self.lock().auth
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_state() == AuthState::Authenticated
    }

    pub fn auth_error(&self) -> Option<String> {
        self.lock().auth_error.clone()
    }

    pub fn log_state(&self) -> LogState {
        self.lock().log.clone()
    }

    pub fn clear_error(&self) -> Option<String> {
        self.lock().clear_error.clone()
    }

    pub fn is_clear_pending(&self) -> bool {
        self.lock().clear_pending
    }

    /// Clearing is offered only for a displayed, non-empty log.
    pub fn clear_enabled(&self) -> bool {
        let state = self.lock();
        state.auth == AuthState::Authenticated
            && !state.clear_pending
            && matches!(state.log, LogState::Loaded(_))
    }

    pub fn refresh_enabled(&self) -> bool {
        let state = self.lock();
        state.auth == AuthState::Authenticated && state.log != LogState::Loading
    }

    // --- Password gate ---

    /// Called on every keystroke in the password field; clears the previous
    /// authentication error.
    pub fn on_password_input(&self) {
        self.lock().auth_error = None;
    }

    /// Checks `candidate` against the shared secret. On success the log is
    /// fetched right away; a failing fetch leaves the controller authenticated
    /// and is reported through `log_state`.
    pub async fn submit_password(&self, candidate: &str) -> Result<(), AdminError> {
        let candidate = candidate.trim();
        let verdict = {
            let mut state = self.lock();
            state.log_generation += 1;
            let verdict = if candidate.is_empty() {
                Err(AdminError::EmptyPassword)
            } else if candidate == ADMIN_PASSWORD {
                Ok(())
            } else {
                Err(AdminError::IncorrectPassword)
            };
            match &verdict {
                Ok(()) => {
                    state.auth = AuthState::Authenticating;
                    state.accepted_password = Some(candidate.to_string());
                    state.auth_error = None;
                }
                Err(e) => {
                    state.auth = AuthState::Unauthenticated;
                    state.accepted_password = None;
                    state.auth_error = Some(e.to_string());
                    state.log = LogState::NotRequested;
                }
            }
            verdict
        };

        match verdict {
            Ok(()) => {
                info!("Admin password accepted.");
                if let Err(e) = self.fetch_log().await {
                    warn!("Initial visitor log fetch failed: {}", e);
                }
                let mut state = self.lock();
                if state.auth == AuthState::Authenticating
                    && state.accepted_password.as_deref() == Some(candidate)
                {
                    state.auth = AuthState::Authenticated;
                }
                Ok(())
            }
            Err(e) => {
                warn!("Admin password rejected: {}", e);
                Err(e)
            }
        }
    }

    // --- Visitor log ---

    /// Fetches the visitor log with the accepted password. Returns the number
    /// of entries shown. A response that arrives after the password was
    /// re-submitted, or after a newer fetch started, is dropped.
    pub async fn fetch_log(&self) -> Result<usize, AdminError> {
        let (password, generation) = {
            let mut state = self.lock();
            let password = state
                .accepted_password
                .clone()
                .ok_or(AdminError::NotAuthenticated)?;
            state.log_generation += 1;
            state.log = LogState::Loading;
            (password, state.log_generation)
        };

        let result = self.directory.get_visitor_log(&password).await;

        let mut state = self.lock();
        if state.log_generation != generation {
            warn!("Dropping a stale visitor log response.");
            return Err(match state.accepted_password {
                Some(_) => AdminError::Superseded,
                None => AdminError::NotAuthenticated,
            });
        }
        match result {
            Ok(Some(entries)) if entries.is_empty() => {
                state.log = LogState::Empty;
                Ok(0)
            }
            Ok(Some(entries)) => {
                let rows = newest_first(entries);
                let shown = rows.len();
                state.log = LogState::Loaded(rows);
                Ok(shown)
            }
            Ok(None) => {
                let err = AdminError::LogUnavailable;
                error!("Visitor log query rejected by the directory.");
                state.log = LogState::Failed(err.to_string());
                Err(err)
            }
            Err(e) => {
                error!("Failed to fetch the visitor log: {}", e);
                state.log = LogState::Failed(e.to_string());
                Err(AdminError::Port(e))
            }
        }
    }

    /// Re-issues the log query unconditionally. Also the retry affordance.
    pub async fn refresh(&self) -> Result<usize, AdminError> {
        self.fetch_log().await
    }

    /// Clears the whole log, then refreshes the log and the notification feed.
    /// The refresh starts only after the clear has completed.
    pub async fn clear_log(&self) -> Result<ClearOutcome, AdminError> {
        let password = {
            let mut state = self.lock();
            let password = state
                .accepted_password
                .clone()
                .ok_or(AdminError::NotAuthenticated)?;
            if state.clear_pending || !matches!(state.log, LogState::Loaded(_)) {
                return Ok(ClearOutcome::Skipped);
            }
            state.clear_pending = true;
            state.clear_error = None;
            password
        };

        let result = self.directory.clear_visitor_log(&password).await;

        let outcome = {
            let mut state = self.lock();
            state.clear_pending = false;
            match result {
                Ok(true) => Ok(()),
                Ok(false) => {
                    let err = AdminError::ClearRejected;
                    state.clear_error = Some(err.to_string());
                    Err(err)
                }
                Err(e) => {
                    state.clear_error = Some(e.to_string());
                    Err(AdminError::Port(e))
                }
            }
        };

        if let Err(e) = outcome {
            error!("Failed to clear the visitor log: {}", e);
            return Err(e);
        }

        info!("Visitor log cleared.");
        let (refreshed, _) = tokio::join!(self.refresh(), self.feed.refresh());
        if let Err(e) = refreshed {
            warn!("Visitor log refresh after clear failed: {}", e);
        }
        Ok(ClearOutcome::Cleared)
    }
}

/// Reverses arrival order and numbers rows from the log length down to 1.
fn newest_first(entries: Vec<VisitorEntry>) -> Vec<LogRow> {
    let total = entries.len();
    entries
        .into_iter()
        .rev()
        .enumerate()
        .map(|(i, entry)| LogRow {
            badge: total - i,
            display_time: format_timestamp(entry.timestamp),
            username: entry.username,
            timestamp: entry.timestamp,
        })
        .collect()
}
