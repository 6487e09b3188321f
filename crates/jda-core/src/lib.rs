//! # jda-core
//!
//! Domain layer of the guild permission core: snowflakes, permission flags,
//! guild entities, capability-based channels and the concurrent snowflake store.
//! This crate knows nothing about transports or configuration.

pub mod entities;
pub mod error;
pub mod store;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::channel::{
    BitrateLimited, Categorizable, Channel, MessageChannel, PermissionContainer, Positioned,
};
pub use entities::{
    ChannelType, Guild, GuildChannel, Member, OverrideHolder, PermissionOverride, Role, User,
    VoiceState,
};
pub use error::DomainError;
pub use store::{SnowflakeStore, SortOrder};
pub use traits::{GuildView, ViewResult};
pub use value_objects::{Permissions, Snowflake, SnowflakeParseError};
