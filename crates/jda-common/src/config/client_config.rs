//! Client configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use tracing::Level;

use super::{CacheConfig, CacheFlags, MemberCachePolicy};

/// Main client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub app: AppSettings,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(ConfigError::InvalidValue("JDA_ENV", value.to_string())),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: Level,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "jda-client".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_log_level() -> Level {
    Level::INFO
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = lookup("JDA_ENV")
            .map(|s| Environment::parse(&s))
            .transpose()?
            .unwrap_or_else(default_env);

        Ok(Self {
            app: AppSettings {
                name: lookup("JDA_APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            cache: CacheConfig {
                flags: lookup("JDA_CACHE_FLAGS")
                    .map(|s| CacheFlags::parse_list(&s))
                    .transpose()?
                    .unwrap_or_default(),
                member_policy: lookup("JDA_MEMBER_CACHE_POLICY")
                    .map(|s| MemberCachePolicy::parse(&s))
                    .transpose()?
                    .unwrap_or_default(),
                shard_amount: lookup("JDA_CACHE_SHARDS")
                    .map(|s| {
                        s.trim()
                            .parse::<usize>()
                            .map_err(|_| ConfigError::InvalidValue("JDA_CACHE_SHARDS", s))
                    })
                    .transpose()?,
            },
            logging: LoggingConfig {
                level: lookup("JDA_LOG_LEVEL")
                    .map(|s| {
                        s.trim()
                            .parse::<Level>()
                            .map_err(|_| ConfigError::InvalidValue("JDA_LOG_LEVEL", s))
                    })
                    .transpose()?
                    .unwrap_or_else(default_log_level),
                json: lookup("JDA_LOG_JSON")
                    .map(|s| parse_bool("JDA_LOG_JSON", &s))
                    .transpose()?
                    .unwrap_or_else(|| env.is_production()),
            },
        })
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(key, value.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl ConfigError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidValue(..) => "CONFIG_INVALID_VALUE",
        }
    }
}
