//! # jda-cache
//!
//! In-memory entity cache for the guild permission core.
//!
//! ## Features
//!
//! - **Snapshots**: serde types for the inbound guild, channel, role and member payloads
//! - **GuildCache**: roles, channels and members of one guild in ordered concurrent stores
//! - **EntityCache**: lifecycle operations that keep the cached graph consistent
//!
//! ## Example
//!
//! ```ignore
//! use jda_cache::{EntityCache, GuildSnapshot};
//!
//! let cache = EntityCache::new(self_user, config.cache);
//! let guild = cache.guild_create(snapshot)?;
//! cache.role_delete(guild.id(), role_id)?;
//! ```

pub mod entity_cache;
pub mod guild_cache;
pub mod snapshot;

pub use entity_cache::{CacheResult, EntityCache};
pub use guild_cache::GuildCache;
pub use snapshot::{
    ChannelData, GuildSnapshot, GuildUpdate, MemberData, OverrideData, RoleData, ThreadMetadata,
    UserData, VoiceStateData,
};
