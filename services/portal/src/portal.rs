//! services/portal/src/portal.rs
//!
//! Client-side navigation. `Portal` owns one tab's session and decides, for
//! every requested location, which page is actually entered.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use visitor_portal_core::domain::Route;
use visitor_portal_core::ports::VisitorDirectory;

use crate::admin::notifications::{DEFAULT_POLL_INTERVAL, DEFAULT_WINDOW};
use crate::admin::AdminView;
use crate::config::Config;
use crate::login::{LoginFlow, LoginPage};
use crate::routing::{GuardOutcome, RouteGuard};
use crate::session::SessionContext;

/// Notification feed settings handed to every mounted admin view.
#[derive(Debug, Clone, Copy)]
pub struct PortalSettings {
    pub poll_interval: Duration,
    pub notification_window: usize,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            notification_window: DEFAULT_WINDOW,
        }
    }
}

impl From<&Config> for PortalSettings {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval,
            notification_window: config.notification_window,
        }
    }
}

/// The page a navigation ended on, ready for a renderer.
pub enum Page {
    Login(LoginPage),
    /// A static informational page; its content belongs to the renderer.
    Info(Route),
    Admin(AdminView),
}

impl Page {
    pub fn route(&self) -> Route {
        match self {
            Page::Login(_) => Route::Login,
            Page::Info(route) => *route,
            Page::Admin(_) => Route::Admin,
        }
    }
}

pub struct Navigation {
    pub requested: Route,
    pub page: Page,
}

impl Navigation {
    pub fn landed(&self) -> Route {
        self.page.route()
    }

    pub fn was_redirected(&self) -> bool {
        self.requested != self.landed()
    }
}

pub struct Portal {
    session: SessionContext,
    guard: RouteGuard,
    directory: Arc<dyn VisitorDirectory>,
    settings: PortalSettings,
}

impl Portal {
    pub fn new(
        session: SessionContext,
        directory: Arc<dyn VisitorDirectory>,
        settings: PortalSettings,
    ) -> Self {
        Self {
            guard: RouteGuard::new(session.clone()),
            session,
            directory,
            settings,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// The name shown in the header, if the visitor has logged in.
    pub fn header_username(&self) -> Option<String> {
        self.session.username()
    }

    /// Navigates to a location. Unknown locations resolve to the login route.
    pub fn navigate(&self, location: &str) -> Navigation {
        let requested = Route::from_path(location).unwrap_or(Route::Login);
        Navigation {
            requested,
            page: self.enter(requested),
        }
    }

    /// Runs the route's entry hook or guard, then builds its page. A failed
    /// guard short-circuits before the route starts any of its own work.
    pub fn enter(&self, route: Route) -> Page {
        if route == Route::Login {
            self.session.mark_app_session_started();
            return Page::Login(LoginPage::new(LoginFlow::new(
                self.session.clone(),
                self.directory.clone(),
            )));
        }

        match self.guard.check(route) {
            GuardOutcome::Redirect(to) => {
                debug!("Entering {} instead of {}", to.path(), route.path());
                self.enter(to)
            }
            GuardOutcome::Proceed if route == Route::Admin => Page::Admin(AdminView::mount(
                self.directory.clone(),
                self.settings.poll_interval,
                self.settings.notification_window,
            )),
            GuardOutcome::Proceed => Page::Info(route),
        }
    }
}
