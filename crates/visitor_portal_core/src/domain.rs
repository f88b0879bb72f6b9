//! crates/visitor_portal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the portal.
//! These types are independent of any transport or serialization format.

/// Session key holding the identity entered at login.
pub const USERNAME_KEY: &str = "username";

/// Session key marking that this tab's navigation started at the login route.
pub const APP_SESSION_KEY: &str = "appSession";

/// One recorded visit, as held by the remote visitor directory.
///
/// The timestamp is assigned by the directory at write time (nanoseconds
/// since the Unix epoch), never by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorEntry {
    pub username: String,
    pub timestamp: u64,
}

impl VisitorEntry {
    pub fn new(username: impl Into<String>, timestamp: u64) -> Self {
        Self {
            username: username.into(),
            timestamp,
        }
    }
}

/// The check a route runs before it is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    /// Requires a username in the session.
    Strict,
    /// Requires only that the tab has passed through the login route.
    Weak,
}

/// Every client-side route the portal knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Host,
    Team,
    Resources,
    Project,
    Admin,
}

impl Route {
    /// Where a successful login lands.
    pub const LANDING: Route = Route::Host;

    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Host,
        Route::Team,
        Route::Resources,
        Route::Project,
        Route::Admin,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Host => "/host",
            Route::Team => "/team",
            Route::Resources => "/resources",
            Route::Project => "/project",
            Route::Admin => "/admin",
        }
    }

    /// Resolves a location to a route. Query strings and fragments are ignored,
    /// as is a trailing slash.
    pub fn from_path(location: &str) -> Option<Route> {
        let path = location
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or_default()
            .trim();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Route::ALL.into_iter().find(|route| route.path() == path)
    }

    /// The guard evaluated before entering this route, if any.
    pub fn guard(&self) -> Option<GuardKind> {
        match self {
            Route::Login => None,
            Route::Admin => Some(GuardKind::Weak),
            Route::Host | Route::Team | Route::Resources | Route::Project => {
                Some(GuardKind::Strict)
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Host => "Host Details",
            Route::Team => "Team Members",
            Route::Resources => "Resources",
            Route::Project => "Project Details",
            Route::Admin => "Admin Panel",
        }
    }
}
