//! services/portal/src/admin/notifications.rs
//!
//! The rolling notification feed and the background task that keeps it fresh.
//!
//! The feed is a window over the same visitor log the admin controller reads,
//! but it is never gated by the admin password and never surfaces errors: a
//! failed poll simply shows an empty list until the next tick.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use visitor_portal_core::domain::VisitorEntry;
use visitor_portal_core::ports::VisitorDirectory;

pub const DEFAULT_WINDOW: usize = 10;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(30_000);

//=========================================================================================
// NotificationFeed
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// No poll has completed yet.
    Loading,
    /// Newest first, at most `window` entries.
    Ready(Vec<VisitorEntry>),
}

pub struct NotificationFeed {
    directory: Arc<dyn VisitorDirectory>,
    window: usize,
    state: Mutex<FeedState>,
}

impl NotificationFeed {
    pub fn new(directory: Arc<dyn VisitorDirectory>, window: usize) -> Self {
        Self {
            directory,
            window,
            state: Mutex::new(FeedState::Loading),
        }
    }

    /// Fetches the log and stores its newest window. Failures degrade to an
    /// empty feed. Returns the number of entries now shown.
    pub async fn refresh(&self) -> usize {
        let entries = match self.directory.get_notifications().await {
            Ok(entries) => newest_window(entries, self.window),
            Err(e) => {
                warn!("Notification poll failed, showing an empty feed: {}", e);
                Vec::new()
            }
        };
        let shown = entries.len();
        *self.lock() = FeedState::Ready(entries);
        shown
    }

    pub fn state(&self) -> FeedState {
        self.lock().clone()
    }

    /// The entries to display; empty while still loading.
    pub fn entries(&self) -> Vec<VisitorEntry> {
        match &*self.lock() {
            FeedState::Loading => Vec::new(),
            FeedState::Ready(entries) => entries.clone(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Keeps the last `window` entries of an arrival-ordered log, newest first.
pub fn newest_window(entries: Vec<VisitorEntry>, window: usize) -> Vec<VisitorEntry> {
    let skip = entries.len().saturating_sub(window);
    entries.into_iter().skip(skip).rev().collect()
}

//=========================================================================================
// Poller
//=========================================================================================

/// Handle to a running poller. Cancelling (or dropping) it stops the schedule;
/// no tick fires after cancellation is observed.
pub struct PollerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancels the poller and waits for its task to finish.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Notification poller ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Starts polling `feed` every `period`. The first poll happens immediately.
pub fn spawn_poller(feed: Arc<NotificationFeed>, period: Duration) -> PollerHandle {
    let token = CancellationToken::new();
    let task = tokio::spawn(poll_notifications(feed, period, token.clone()));
    PollerHandle {
        token,
        task: Some(task),
    }
}

async fn poll_notifications(feed: Arc<NotificationFeed>, period: Duration, token: CancellationToken) {
    info!("Notification poller started ({:?} interval).", period);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    shown = feed.refresh() => debug!("Notification feed refreshed ({} shown).", shown),
                }
            }
        }
    }

    info!("Notification poller stopped.");
}
