//! services/portal/src/routing.rs
//!
//! Route guards. Both variants are synchronous and run before a route's
//! content or data loads are started.

use crate::session::SessionContext;
use tracing::debug;
use visitor_portal_core::domain::{GuardKind, Route};

/// The result of evaluating a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    /// Navigation is abandoned in favour of the given route.
    Redirect(Route),
}

#[derive(Clone)]
pub struct RouteGuard {
    session: SessionContext,
}

impl RouteGuard {
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }

    /// Requires a username in the session.
    pub fn strict(&self) -> GuardOutcome {
        match self.session.username() {
            Some(_) => GuardOutcome::Proceed,
            None => GuardOutcome::Redirect(Route::Login),
        }
    }

    /// Requires only that the tab passed through the login route; the
    /// username is not consulted.
    pub fn weak(&self) -> GuardOutcome {
        if self.session.has_app_session() {
            GuardOutcome::Proceed
        } else {
            GuardOutcome::Redirect(Route::Login)
        }
    }

    /// Runs whichever guard `route` declares.
    pub fn check(&self, route: Route) -> GuardOutcome {
        let outcome = match route.guard() {
            None => GuardOutcome::Proceed,
            Some(GuardKind::Strict) => self.strict(),
            Some(GuardKind::Weak) => self.weak(),
        };
        if let GuardOutcome::Redirect(to) = outcome {
            debug!("Guard redirected {} to {}", route.path(), to.path());
        }
        outcome
    }
}
