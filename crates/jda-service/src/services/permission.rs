//! Permission service
//!
//! Handles permission checking and computation for cached guild members.

use std::sync::Arc;

use jda_cache::GuildCache;
use jda_core::{Channel, DomainError, GuildChannel, GuildView, Permissions, Snowflake};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::resolver;

/// Permission service for access control
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check if a user owns a guild
    #[instrument(skip(self))]
    pub fn is_guild_owner(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<bool> {
        Ok(self.ctx.guild(guild_id)?.is_owner(user_id))
    }

    /// Check if a user has a specific permission in a guild
    #[instrument(skip(self))]
    pub fn check_permission(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        permission: Permissions,
    ) -> ServiceResult<bool> {
        let permissions = self.get_member_permissions(guild_id, user_id)?;
        Ok(permissions.contains(permission))
    }

    /// Check if a user has a specific permission in a channel
    #[instrument(skip(self))]
    pub fn check_channel_permission(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        permission: Permissions,
    ) -> ServiceResult<bool> {
        let permissions = self.compute_channel_permissions(channel_id, user_id)?;
        Ok(permissions.contains(permission))
    }

    /// Check permission and return error if denied
    #[instrument(skip(self))]
    pub fn require_permission(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        permission: Permissions,
    ) -> ServiceResult<()> {
        let permissions = self.get_member_permissions(guild_id, user_id)?;
        match permissions.first_missing(permission) {
            Some(missing) => Err(ServiceError::insufficient(guild_id, None, missing)),
            None => Ok(()),
        }
    }

    /// Check channel permission and return error if denied
    #[instrument(skip(self))]
    pub fn require_channel_permission(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        permission: Permissions,
    ) -> ServiceResult<()> {
        let (guild, channel) = self.ctx.channel(channel_id)?;
        let permissions = self.channel_permissions(&guild, &channel, user_id)?;
        match permissions.first_missing(permission) {
            Some(missing) => Err(ServiceError::insufficient(guild.id(), Some(channel_id), missing)),
            None => Ok(()),
        }
    }

    /// Get all guild-level permissions for a member
    #[instrument(skip(self))]
    pub fn get_member_permissions(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Permissions> {
        let guild = self.ctx.guild(guild_id)?;

        if guild.is_owner(user_id) {
            debug!(user_id = %user_id, guild_id = %guild_id, "User is guild owner, granting all permissions");
            return Ok(Permissions::all());
        }

        let member = self.ctx.member(&guild, user_id)?;
        let permissions = resolver::effective_permissions(guild.as_ref(), &member, None)?;

        debug!(
            user_id = %user_id,
            guild_id = %guild_id,
            permissions = %permissions,
            "Computed member permissions"
        );

        Ok(permissions)
    }

    /// Compute permissions for a specific channel (with overrides)
    ///
    /// Threads resolve against their parent channel. A member who cannot
    /// see the channel holds no permission in it.
    #[instrument(skip(self))]
    pub fn compute_channel_permissions(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Permissions> {
        let (guild, channel) = self.ctx.channel(channel_id)?;
        self.channel_permissions(&guild, &channel, user_id)
    }

    fn channel_permissions(
        &self,
        guild: &GuildCache,
        channel: &Arc<GuildChannel>,
        user_id: Snowflake,
    ) -> ServiceResult<Permissions> {
        let member = self.ctx.member(guild, user_id)?;
        let source = permission_source(guild, Arc::clone(channel))?;
        let container = source
            .as_permission_container()
            .ok_or(DomainError::NotPermissionContainer(source.id()))?;

        let permissions = resolver::accessible_permissions(guild, &member, container)?;

        debug!(
            user_id = %user_id,
            channel_id = %channel.id(),
            source_id = %source.id(),
            permissions = %permissions,
            "Computed channel permissions"
        );

        Ok(permissions)
    }
}

/// Channel whose overrides decide access to `channel`
pub(crate) fn permission_source(
    guild: &GuildCache,
    channel: Arc<GuildChannel>,
) -> ServiceResult<Arc<GuildChannel>> {
    match channel.as_thread().map(|thread| thread.parent_id) {
        Some(parent_id) => guild
            .channel(parent_id)
            .ok_or_else(|| DomainError::ChannelNotFound(parent_id).into()),
        None => Ok(channel),
    }
}
