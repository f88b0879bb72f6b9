//! services/portal/src/adapters/memory_directory.rs
//!
//! An in-memory implementation of the `VisitorDirectory` port. It backs the
//! development directory server and the test suite. Nothing is persisted.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use tracing::info;
use visitor_portal_core::domain::VisitorEntry;
use visitor_portal_core::ports::{PortError, PortResult, VisitorDirectory};

pub struct InMemoryVisitorDirectory {
    password: String,
    entries: Mutex<Vec<VisitorEntry>>,
}

impl InMemoryVisitorDirectory {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<VisitorEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Wall-clock nanoseconds, forced strictly past the newest entry so that
    /// timestamps increase with arrival order.
    fn next_timestamp(entries: &[VisitorEntry]) -> u64 {
        let now = Utc::now()
            .timestamp_nanos_opt()
            .and_then(|nanos| u64::try_from(nanos).ok())
            .unwrap_or_default();
        match entries.last() {
            Some(last) if last.timestamp >= now => last.timestamp + 1,
            _ => now,
        }
    }
}

#[async_trait]
impl VisitorDirectory for InMemoryVisitorDirectory {
    async fn log_visitor(&self, username: &str) -> PortResult<()> {
        if username.trim().is_empty() {
            return Err(PortError::InvalidInput("username must not be empty".to_string()));
        }
        let mut entries = self.lock();
        let timestamp = Self::next_timestamp(&entries);
        entries.push(VisitorEntry::new(username, timestamp));
        info!("Recorded visitor '{}' ({} total)", username, entries.len());
        Ok(())
    }

    async fn get_notifications(&self) -> PortResult<Vec<VisitorEntry>> {
        Ok(self.lock().clone())
    }

    async fn get_visitor_log(&self, password: &str) -> PortResult<Option<Vec<VisitorEntry>>> {
        if password != self.password {
            return Ok(None);
        }
        Ok(Some(self.lock().clone()))
    }

    async fn clear_visitor_log(&self, password: &str) -> PortResult<bool> {
        if password != self.password {
            return Ok(false);
        }
        let mut entries = self.lock();
        let removed = entries.len();
        entries.clear();
        info!("Cleared visitor log ({} entries removed)", removed);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_in_arrival_order_with_increasing_timestamps() {
        let directory = InMemoryVisitorDirectory::new("CUTOUT");
        for name in ["a", "b", "c"] {
            directory.log_visitor(name).await.unwrap();
        }

        let entries = directory.get_notifications().await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(entries.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[tokio::test]
    async fn same_name_may_appear_many_times() {
        let directory = InMemoryVisitorDirectory::new("CUTOUT");
        directory.log_visitor("alice").await.unwrap();
        directory.log_visitor("alice").await.unwrap();
        assert_eq!(directory.len(), 2);
    }

    #[tokio::test]
    async fn rejects_blank_username() {
        let directory = InMemoryVisitorDirectory::new("CUTOUT");
        let err = directory.log_visitor("  ").await.unwrap_err();
        assert!(matches!(err, PortError::InvalidInput(_)));
        assert!(directory.is_empty());
    }

    #[tokio::test]
    async fn log_requires_password() {
        let directory = InMemoryVisitorDirectory::new("CUTOUT");
        directory.log_visitor("alice").await.unwrap();

        assert_eq!(directory.get_visitor_log("nope").await.unwrap(), None);
        let log = directory.get_visitor_log("CUTOUT").await.unwrap().unwrap();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn empty_log_is_not_absent() {
        let directory = InMemoryVisitorDirectory::new("CUTOUT");
        assert_eq!(directory.get_visitor_log("CUTOUT").await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn clear_requires_password_and_removes_everything() {
        let directory = InMemoryVisitorDirectory::new("CUTOUT");
        directory.log_visitor("alice").await.unwrap();
        directory.log_visitor("bob").await.unwrap();

        assert!(!directory.clear_visitor_log("wrong").await.unwrap());
        assert_eq!(directory.len(), 2);

        assert!(directory.clear_visitor_log("CUTOUT").await.unwrap());
        assert!(directory.is_empty());
        assert!(directory.get_notifications().await.unwrap().is_empty());
    }
}
