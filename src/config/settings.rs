//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::trace::{LogLevel, SinkConfig};

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Bot identity and platform credentials
    pub bot: BotSettings,

    /// Trace-log sink configuration
    pub logging: LoggingSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotSettings {
    /// Platform token, passed through to the client on connect
    pub token: String,

    /// Guild the bot reports into
    pub guild: String,

    /// Display name the bot posts under (and ignores its own messages by)
    pub name: String,

    /// Channel greeted on connect
    pub home_channel: String,
}

/// Trace-log sink configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Directory holding the shared and per-thread log files
    pub directory: String,

    /// Minimum severity written to the sinks (trace, debug, info, warn, error)
    pub level: String,

    /// Line cap for file sinks
    pub file_line_limit: usize,

    /// Line cap for the console echo
    pub console_line_limit: usize,

    /// Spaces per call-depth level
    pub indent_width: usize,

    /// Echo accepted lines to stdout
    pub echo_console: bool,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("bot.token", "")?
            .set_default("bot.guild", "")?
            .set_default("bot.name", "salbot")?
            .set_default("bot.home_channel", "general")?
            .set_default("logging.directory", "log")?
            .set_default("logging.level", "debug")?
            .set_default("logging.file_line_limit", 1024_i64)?
            .set_default("logging.console_line_limit", 120_i64)?
            .set_default("logging.indent_width", 3_i64)?
            .set_default("logging.echo_console", false)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__LOGGING__LEVEL=trace -> logging.level = trace
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("bot.token", std::env::var("DISCORD_TOKEN").ok())?
            .set_override_option("bot.guild", std::env::var("DISCORD_GUILD").ok())?
            .set_override_option("logging.directory", std::env::var("LOG_DIR").ok())?
            .build()?
            .try_deserialize()
    }
}

impl LoggingSettings {
    /// Translate into the sink manager's configuration.
    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            directory: PathBuf::from(&self.directory),
            min_level: LogLevel::parse(&self.level),
            file_line_limit: self.file_line_limit,
            console_line_limit: self.console_line_limit,
            indent_width: self.indent_width,
            echo_console: self.echo_console,
        }
    }
}
