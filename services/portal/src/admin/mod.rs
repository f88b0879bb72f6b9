//! services/portal/src/admin/mod.rs
//!
//! The admin panel: password gate, visitor log, and the notification feed.

pub mod controller;
pub mod notifications;
pub mod view;

use chrono::{DateTime, Local};

pub use controller::{AdminController, AdminError, AuthState, ClearOutcome, LogRow, LogState};
pub use notifications::{spawn_poller, FeedState, NotificationFeed, PollerHandle};
pub use view::AdminView;

/// The single shared secret that unlocks the admin panel.
pub const ADMIN_PASSWORD: &str = "CUTOUT";

/// Renders a directory timestamp (nanoseconds since the epoch) as a local
/// date-time string.
pub fn format_timestamp(nanos: u64) -> String {
    let secs = nanos / 1_000_000_000;
    let subsec = (nanos % 1_000_000_000) as u32;
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, subsec))
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "Invalid date".to_string())
}
