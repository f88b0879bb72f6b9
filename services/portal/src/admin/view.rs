//! services/portal/src/admin/view.rs
//!
//! The mounted admin page. Mounting starts the notification poller; unmounting
//! (or dropping the view) stops it.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use visitor_portal_core::domain::VisitorEntry;
use visitor_portal_core::ports::VisitorDirectory;

use super::controller::AdminController;
use super::notifications::{spawn_poller, FeedState, NotificationFeed, PollerHandle};

pub struct AdminView {
    controller: AdminController,
    feed: Arc<NotificationFeed>,
    poller: PollerHandle,
}

impl AdminView {
    /// Mounts the view. Must be called from within a Tokio runtime.
    pub fn mount(directory: Arc<dyn VisitorDirectory>, poll_interval: Duration, window: usize) -> Self {
        let feed = Arc::new(NotificationFeed::new(directory.clone(), window));
        let controller = AdminController::new(directory, feed.clone());
        let poller = spawn_poller(feed.clone(), poll_interval);
        info!("Admin view mounted.");
        Self {
            controller,
            feed,
            poller,
        }
    }

    pub fn controller(&self) -> &AdminController {
        &self.controller
    }

    pub fn feed_state(&self) -> FeedState {
        self.feed.state()
    }

    /// Recent visitors, newest first.
    pub fn notifications(&self) -> Vec<VisitorEntry> {
        self.feed.entries()
    }

    pub fn is_polling(&self) -> bool {
        !self.poller.is_cancelled()
    }

    /// Tears the view down and waits for the poller to stop.
    pub async fn unmount(self) {
        self.poller.stop().await;
        info!("Admin view unmounted.");
    }
}
