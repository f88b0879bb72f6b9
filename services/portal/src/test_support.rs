//! services/portal/src/test_support.rs
//!
//! A scriptable `VisitorDirectory` for unit tests: counts calls and can be
//! told to fail, to answer with the absent-marker, or to hold a log fetch open.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;
use visitor_portal_core::domain::VisitorEntry;
use visitor_portal_core::ports::{PortError, PortResult, VisitorDirectory};

use crate::admin::ADMIN_PASSWORD;

/// `visitor-1 ..= visitor-n`, timestamps `1 ..= n`, in arrival order.
pub fn entries(n: u64) -> Vec<VisitorEntry> {
    (1..=n)
        .map(|i| VisitorEntry::new(format!("visitor-{}", i), i))
        .collect()
}

#[derive(Default)]
pub struct ScriptedDirectory {
    entries: Mutex<Vec<VisitorEntry>>,
    fail_record: AtomicBool,
    fail_notifications: AtomicBool,
    fail_log: AtomicBool,
    absent_log: AtomicBool,
    fail_clear: AtomicBool,
    hold_log: AtomicBool,
    log_released: Notify,
    record_calls: AtomicUsize,
    notification_calls: AtomicUsize,
    log_calls: AtomicUsize,
    clear_calls: AtomicUsize,
}

impl ScriptedDirectory {
    pub fn with_entries(entries: Vec<VisitorEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    pub fn fail_record(&self, fail: bool) {
        self.fail_record.store(fail, Ordering::SeqCst);
    }

    pub fn fail_notifications(&self, fail: bool) {
        self.fail_notifications.store(fail, Ordering::SeqCst);
    }

    pub fn fail_log(&self, fail: bool) {
        self.fail_log.store(fail, Ordering::SeqCst);
    }

    pub fn absent_log(&self, absent: bool) {
        self.absent_log.store(absent, Ordering::SeqCst);
    }

    pub fn fail_clear(&self, fail: bool) {
        self.fail_clear.store(fail, Ordering::SeqCst);
    }

    /// Log fetches wait for `release_log` while held.
    pub fn hold_log(&self, hold: bool) {
        self.hold_log.store(hold, Ordering::SeqCst);
    }

    pub fn release_log(&self) {
        self.log_released.notify_one();
    }

    pub fn stored(&self) -> Vec<VisitorEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn record_calls(&self) -> usize {
        self.record_calls.load(Ordering::SeqCst)
    }

    pub fn notification_calls(&self) -> usize {
        self.notification_calls.load(Ordering::SeqCst)
    }

    pub fn log_calls(&self) -> usize {
        self.log_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisitorDirectory for ScriptedDirectory {
    async fn log_visitor(&self, username: &str) -> PortResult<()> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_record.load(Ordering::SeqCst) {
            return Err(PortError::Unavailable("record failed".to_string()));
        }
        let mut entries = self.entries.lock().unwrap();
        let timestamp = entries.last().map_or(1, |last| last.timestamp + 1);
        entries.push(VisitorEntry::new(username, timestamp));
        Ok(())
    }

    async fn get_notifications(&self) -> PortResult<Vec<VisitorEntry>> {
        self.notification_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(PortError::Unavailable("notifications failed".to_string()));
        }
        Ok(self.stored())
    }

    async fn get_visitor_log(&self, password: &str) -> PortResult<Option<Vec<VisitorEntry>>> {
        self.log_calls.fetch_add(1, Ordering::SeqCst);
        if self.hold_log.load(Ordering::SeqCst) {
            self.log_released.notified().await;
        }
        if self.fail_log.load(Ordering::SeqCst) {
            return Err(PortError::Unavailable("log failed".to_string()));
        }
        if self.absent_log.load(Ordering::SeqCst) || password != ADMIN_PASSWORD {
            return Ok(None);
        }
        Ok(Some(self.stored()))
    }

    async fn clear_visitor_log(&self, password: &str) -> PortResult<bool> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(PortError::Unavailable("clear failed".to_string()));
        }
        if password != ADMIN_PASSWORD {
            return Ok(false);
        }
        self.entries.lock().unwrap().clear();
        Ok(true)
    }
}
