//! Configuration module for housebot.

use std::num::NonZeroUsize;
use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::{HousebotError, Result};

/// Environment variable that overrides `bot.token`.
pub const TOKEN_ENV_VAR: &str = "HOUSEBOT_TOKEN";

/// Chat transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Telegram bot token.
    #[serde(default)]
    pub token: String,
    /// Base URL of the Bot API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Long-poll timeout in seconds for `getUpdates`.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_api_url(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/housebot.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Household configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HouseholdConfig {
    /// Number of people the total cost is split between.
    #[serde(default = "default_participant_count")]
    pub participant_count: usize,
    /// Day of the month rent is due.
    #[serde(default = "default_rent_day")]
    pub rent_day: u32,
    /// Timezone for dates in replies and the rent countdown.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Emoji shown for people who have not set one.
    #[serde(default = "default_emoji")]
    pub default_emoji: String,
    /// Participant ids that always take part in the split, paid or not.
    ///
    /// Empty means only people who have paid something show up in balances.
    #[serde(default)]
    pub roster: Vec<i64>,
}

fn default_participant_count() -> usize {
    3
}

fn default_rent_day() -> u32 {
    27
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_emoji() -> String {
    "🤔".to_string()
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            participant_count: default_participant_count(),
            rent_day: default_rent_day(),
            timezone: default_timezone(),
            default_emoji: default_emoji(),
            roster: Vec::new(),
        }
    }
}

impl HouseholdConfig {
    /// Household size as a nonzero count.
    pub fn size(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.participant_count).ok_or_else(|| {
            HousebotError::Config("household.participant_count must be at least 1".to_string())
        })
    }

    /// Parsed timezone, falling back to UTC for unknown names.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/housebot.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Chat transport configuration.
    #[serde(default)]
    pub bot: BotConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Household configuration.
    #[serde(default)]
    pub household: HouseholdConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| HousebotError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides.
    ///
    /// Supported environment variables:
    /// - `HOUSEBOT_TOKEN`: bot token
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.trim().is_empty() {
                self.bot.token = token.trim().to_string();
            }
        }
    }

    /// Validate the household and logging settings.
    pub fn validate(&self) -> Result<()> {
        self.household.size()?;

        if !(1..=31).contains(&self.household.rent_day) {
            return Err(HousebotError::Config(format!(
                "household.rent_day must be between 1 and 31, got {}",
                self.household.rent_day
            )));
        }

        if self.household.timezone.parse::<Tz>().is_err() {
            return Err(HousebotError::Config(format!(
                "unknown timezone: {}",
                self.household.timezone
            )));
        }

        Ok(())
    }

    /// Validate everything needed to connect to the chat service.
    pub fn validate_for_bot(&self) -> Result<()> {
        self.validate()?;
        if self.bot.token.is_empty() {
            return Err(HousebotError::Config(format!(
                "bot token is not set. Set bot.token in config.toml or {TOKEN_ENV_VAR}."
            )));
        }
        Ok(())
    }
}
