pub mod adapters;
pub mod admin;
pub mod config;
pub mod error;
pub mod login;
pub mod portal;
pub mod routing;
pub mod session;
pub mod shell;
pub mod web;

#[cfg(test)]
mod test_support;

pub use portal::{Navigation, Page, Portal, PortalSettings};
pub use session::SessionContext;
