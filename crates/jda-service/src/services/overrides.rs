//! Permission override editing
//!
//! [`PermissionOverrideAction`] builds the new state of one override and
//! checks that the client may apply it.

use std::sync::Arc;

use jda_cache::GuildCache;
use jda_core::{
    Channel, DomainError, GuildChannel, OverrideHolder, PermissionContainer, PermissionOverride,
    Permissions, Snowflake,
};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::resolver;

/// Pending create or edit of the override of one holder on one channel
///
/// Starts from the override currently cached, or from an empty one.
#[derive(Debug)]
pub struct PermissionOverrideAction<'a> {
    ctx: &'a ServiceContext,
    guild: Arc<GuildCache>,
    channel: Arc<GuildChannel>,
    current: Option<PermissionOverride>,
    pending: PermissionOverride,
}

fn container(channel: &GuildChannel) -> Result<&dyn PermissionContainer, DomainError> {
    channel
        .as_permission_container()
        .ok_or(DomainError::NotPermissionContainer(channel.id()))
}

impl<'a> PermissionOverrideAction<'a> {
    /// Start editing the override of `holder_id` on a channel
    ///
    /// The holder must be a role of the channel's guild or a cached member.
    pub fn new(
        ctx: &'a ServiceContext,
        channel_id: Snowflake,
        holder: OverrideHolder,
        holder_id: Snowflake,
    ) -> ServiceResult<Self> {
        let (guild, channel) = ctx.channel(channel_id)?;
        let overrides = container(&channel)?;

        let known = match holder {
            OverrideHolder::Role => guild.roles().contains(holder_id),
            OverrideHolder::Member => guild.members().contains(holder_id),
        };
        if !known {
            return Err(DomainError::ForeignHolder {
                holder_id,
                guild_id: guild.id(),
            }
            .into());
        }

        let current = overrides
            .permission_override(holder_id)
            .map(|ov| *ov)
            .filter(|ov| ov.holder() == holder);
        let pending =
            current.unwrap_or_else(|| PermissionOverride::empty(channel_id, holder_id, holder));

        Ok(Self {
            ctx,
            guild,
            channel,
            current,
            pending,
        })
    }

    /// Whether applying creates a new override
    pub fn is_new(&self) -> bool {
        self.current.is_none()
    }

    /// The override as it would be after applying
    pub fn pending(&self) -> PermissionOverride {
        self.pending
    }

    pub fn grant(mut self, permissions: Permissions) -> Self {
        self.pending = self.pending.grant(permissions);
        self
    }

    pub fn deny(mut self, permissions: Permissions) -> Self {
        self.pending = self.pending.deny_permissions(permissions);
        self
    }

    /// Reset permissions to inherit
    pub fn clear(mut self, permissions: Permissions) -> Self {
        self.pending = self.pending.clear(permissions);
        self
    }

    pub fn set_allow(mut self, allow: Permissions) -> Self {
        self.pending = self.pending.set_allow(allow);
        self
    }

    pub fn set_deny(mut self, deny: Permissions) -> Self {
        self.pending = self.pending.set_deny(deny);
        self
    }

    /// Bits that differ from the current override
    fn changed(&self) -> Permissions {
        let (allow, deny) = self
            .current
            .map_or((Permissions::empty(), Permissions::empty()), |ov| {
                (ov.allowed(), ov.denied())
            });
        (self.pending.allowed() ^ allow) | (self.pending.denied() ^ deny)
    }

    /// Check that the client may apply the pending override
    ///
    /// Requires MANAGE_ROLES in the channel. Unless the client is an
    /// administrator or a channel override allows it MANAGE_ROLES, it may
    /// only grant or deny permissions it holds in the channel.
    #[instrument(skip(self), fields(channel_id = %self.channel.id(), holder_id = %self.pending.holder_id()))]
    pub fn check(&self) -> ServiceResult<PermissionOverride> {
        let guild = self.guild.as_ref();
        let channel_id = self.channel.id();
        let self_member = self.ctx.member(guild, self.ctx.self_user_id())?;
        let channel = container(&self.channel)?;

        let permissions = resolver::effective_permissions(guild, &self_member, Some(channel))?;
        if !permissions.contains(Permissions::MANAGE_ROLES) {
            return Err(ServiceError::insufficient(
                guild.id(),
                Some(channel_id),
                Permissions::MANAGE_ROLES,
            ));
        }

        let guild_permissions = resolver::effective_permissions(guild, &self_member, None)?;
        let (override_allow, _) = resolver::explicit_overrides(guild, &self_member, channel)?;
        if !guild_permissions.contains(Permissions::ADMINISTRATOR)
            && !override_allow.contains(Permissions::MANAGE_ROLES)
        {
            if let Some(missing) = permissions.first_missing(self.changed()) {
                return Err(ServiceError::insufficient(guild.id(), Some(channel_id), missing));
            }
        }

        debug!(
            allow = %self.pending.allowed(),
            deny = %self.pending.denied(),
            is_new = self.is_new(),
            "Override change allowed"
        );
        Ok(self.pending)
    }
}
