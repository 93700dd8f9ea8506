//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__, plus DISCORD_TOKEN,
//!   DISCORD_GUILD, and LOG_DIR shortcuts)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_bot::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Bot '{}' joins guild '{}'", settings.bot.name, settings.bot.guild);
//! ```

mod settings;

pub use settings::*;
