pub mod domain;
pub mod ports;

pub use domain::{GuardKind, Route, VisitorEntry, APP_SESSION_KEY, USERNAME_KEY};
pub use ports::{PortError, PortResult, SessionStore, VisitorDirectory};
