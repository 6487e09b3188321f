//! Service context - shared state handed to every service
//!
//! Services borrow the context and are cheap to build per call.

use std::sync::Arc;

use jda_cache::{EntityCache, GuildCache};
use jda_core::{GuildChannel, Member, Snowflake};

use super::error::{ServiceError, ServiceResult};

/// Service context containing the entity cache
#[derive(Debug, Clone)]
pub struct ServiceContext {
    cache: Arc<EntityCache>,
}

impl ServiceContext {
    pub fn new(cache: Arc<EntityCache>) -> Self {
        Self { cache }
    }

    /// Get the entity cache
    pub fn cache(&self) -> &EntityCache {
        self.cache.as_ref()
    }

    /// ID of the logged-in user
    pub fn self_user_id(&self) -> Snowflake {
        self.cache.self_user_id()
    }

    // === Lookups ===

    pub(crate) fn guild(&self, guild_id: Snowflake) -> ServiceResult<Arc<GuildCache>> {
        self.cache
            .guild(guild_id)
            .ok_or_else(|| ServiceError::not_found("Guild", guild_id.to_string()))
    }

    /// A channel together with the guild that owns it
    pub(crate) fn channel(
        &self,
        channel_id: Snowflake,
    ) -> ServiceResult<(Arc<GuildCache>, Arc<GuildChannel>)> {
        let not_found = || ServiceError::not_found("Channel", channel_id.to_string());
        let guild = self.cache.channel_guild(channel_id).ok_or_else(not_found)?;
        let channel = guild.channel(channel_id).ok_or_else(not_found)?;
        Ok((guild, channel))
    }

    pub(crate) fn member(&self, guild: &GuildCache, user_id: Snowflake) -> ServiceResult<Arc<Member>> {
        guild
            .member(user_id)
            .ok_or_else(|| ServiceError::not_found("Member", format!("{}/{}", guild.id(), user_id)))
    }
}
