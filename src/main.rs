//! # Chat Bot
//!
//! A Discord-style chat bot client with a call-tracing log core.
//!
//! This is the application entry point that initializes:
//! - Operational tracing subscriber
//! - Configuration loading
//! - The guarded trace-sink setup
//! - The bot and its gateway session

use anyhow::Result;
use tracing::info;

use chat_bot::config::Settings;
use chat_bot::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Operational logging for the process itself
    chat_bot::telemetry::init_tracing();

    info!("Starting Chat Bot...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        bot = %settings.bot.name,
        guild = %settings.bot.guild,
        log_dir = %settings.logging.directory,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build the application: guarded sink init, tracer, bot, gateway
    let application = Application::build(settings)?;

    info!("Bot ready, opening session");
    application.run_until_stopped().await?;

    Ok(())
}
