//! services/portal/src/bin/portal.rs
//!
//! Terminal front end: one tab's session against a remote visitor directory.

use portal_lib::{
    adapters::HttpVisitorDirectory, config::Config, error::PortalError, shell::run_shell, Portal,
    PortalSettings, SessionContext,
};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), PortalError> {
    // --- 1. Load Configuration & Set Up Logging ---
    // Logs go to stderr so they do not interleave with the rendered pages.
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Using visitor directory at {}", config.directory_url);

    // --- 2. Wire the Portal ---
    let directory = Arc::new(HttpVisitorDirectory::new(&config.directory_url)?);
    let portal = Portal::new(
        SessionContext::in_memory(),
        directory,
        PortalSettings::from(&config),
    );

    // --- 3. Run the Shell ---
    run_shell(portal, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
