//! # Therapy Module Simulator
//!
//! A virtual therapy module with an attribute-channel gateway.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - The virtual device and its background tasks
//! - HTTP/WebSocket server

use anyhow::Result;
use tracing::info;

use therapy_sim::config::Settings;
use therapy_sim::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    therapy_sim::telemetry::init_tracing();

    info!("Starting therapy module simulator...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        device = %settings.device.name,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Simulator ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
