//! Configuration structs

mod cache_config;
mod client_config;

pub use cache_config::{CacheConfig, CacheFlags, MemberCachePolicy};
pub use client_config::{AppSettings, ClientConfig, ConfigError, Environment, LoggingConfig};
