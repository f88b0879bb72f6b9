//! services/portal/src/session.rs
//!
//! The tab-scoped session context: the two flags that decide which routes a
//! visitor may enter. Guards, the login flow and the portal all receive the
//! same `SessionContext` instead of reaching for ambient storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};
use visitor_portal_core::domain::{APP_SESSION_KEY, USERNAME_KEY};
use visitor_portal_core::ports::SessionStore;

//=========================================================================================
// In-Memory Store (one per tab)
//=========================================================================================

/// Process-local storage that lives exactly as long as the tab that owns it.
#[derive(Default)]
pub struct InMemorySessionStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
    }
}

//=========================================================================================
// SessionContext
//=========================================================================================

/// Typed access to the session flags stored in a `SessionStore`.
///
/// Values are not secrets; the admin password is never written here.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// A fresh context backed by its own in-memory store, i.e. a new tab.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemorySessionStore::new()))
    }

    /// Stores the trimmed username. Callers validate non-emptiness first;
    /// an empty value is ignored rather than stored.
    pub fn set_username(&self, value: &str) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            warn!("Refusing to store an empty username in the session.");
            return;
        }
        self.store.set(USERNAME_KEY, trimmed);
    }

    pub fn username(&self) -> Option<String> {
        self.store.get(USERNAME_KEY).filter(|name| !name.is_empty())
    }

    /// Marks that this tab entered through the login route. Idempotent.
    pub fn mark_app_session_started(&self) {
        if self.has_app_session() {
            return;
        }
        debug!("App session started from the login route.");
        self.store.set(APP_SESSION_KEY, "true");
    }

    pub fn has_app_session(&self) -> bool {
        self.store
            .get(APP_SESSION_KEY)
            .is_some_and(|flag| !flag.is_empty())
    }
}
