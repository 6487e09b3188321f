//! Moderation pre-flight checks
//!
//! Each check runs against the client's own member before a request is
//! built: first the guild permission, then the role hierarchy.

use std::sync::Arc;

use jda_cache::GuildCache;
use jda_core::{Member, Permissions, Role, Snowflake};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{HierarchyError, ServiceError, ServiceResult};
use super::hierarchy::HierarchyGuard;
use super::resolver;

/// Guild-level moderation guard for the logged-in member
pub struct ModerationGuard<'a> {
    ctx: &'a ServiceContext,
    guild: Arc<GuildCache>,
    self_member: Arc<Member>,
}

impl<'a> ModerationGuard<'a> {
    /// Create a guard for a guild the client is a cached member of
    pub fn new(ctx: &'a ServiceContext, guild_id: Snowflake) -> ServiceResult<Self> {
        let guild = ctx.guild(guild_id)?;
        let self_member = ctx.member(&guild, ctx.self_user_id())?;
        Ok(Self {
            ctx,
            guild,
            self_member,
        })
    }

    pub fn guild_id(&self) -> Snowflake {
        self.guild.id()
    }

    /// Guild-level permissions of the client
    pub fn permissions(&self) -> ServiceResult<Permissions> {
        Ok(resolver::effective_permissions(
            self.guild.as_ref(),
            &self.self_member,
            None,
        )?)
    }

    fn require(&self, permission: Permissions) -> ServiceResult<()> {
        match self.permissions()?.first_missing(permission) {
            Some(missing) => Err(ServiceError::insufficient(self.guild_id(), None, missing)),
            None => Ok(()),
        }
    }

    fn hierarchy(&self) -> HierarchyGuard<'_, GuildCache> {
        HierarchyGuard::new(self.guild.as_ref())
    }

    fn require_outranks(&self, target: &Member) -> ServiceResult<()> {
        if self.hierarchy().can_interact(&self.self_member, target)? {
            Ok(())
        } else {
            Err(HierarchyError::Member {
                guild_id: self.guild_id(),
                target_id: target.user_id,
            }
            .into())
        }
    }

    fn require_outranks_role(&self, role: &Role) -> ServiceResult<()> {
        if self.hierarchy().can_interact_role(&self.self_member, role)? {
            Ok(())
        } else {
            Err(HierarchyError::Role {
                guild_id: self.guild_id(),
                role_id: role.id,
            }
            .into())
        }
    }

    fn role(&self, role_id: Snowflake) -> ServiceResult<Arc<Role>> {
        self.guild
            .roles()
            .get(role_id)
            .ok_or_else(|| ServiceError::not_found("Role", role_id.to_string()))
    }

    /// Kicking needs KICK_MEMBERS and a higher role than the target
    #[instrument(skip(self), fields(guild_id = %self.guild_id()))]
    pub fn check_kick(&self, user_id: Snowflake) -> ServiceResult<()> {
        self.require(Permissions::KICK_MEMBERS)?;
        let target = self.ctx.member(&self.guild, user_id)?;
        self.require_outranks(&target)?;
        debug!(user_id = %user_id, "Kick allowed");
        Ok(())
    }

    /// Banning needs BAN_MEMBERS; the hierarchy applies only to cached members
    #[instrument(skip(self), fields(guild_id = %self.guild_id()))]
    pub fn check_ban(&self, user_id: Snowflake) -> ServiceResult<()> {
        self.require(Permissions::BAN_MEMBERS)?;
        if let Some(target) = self.guild.member(user_id) {
            self.require_outranks(&target)?;
        }
        debug!(user_id = %user_id, "Ban allowed");
        Ok(())
    }

    /// Changing a nickname
    ///
    /// The client's own nickname needs CHANGE_NICKNAME. Anyone else's needs a
    /// higher role and MANAGE_NICKNAMES.
    #[instrument(skip(self), fields(guild_id = %self.guild_id()))]
    pub fn check_nickname(&self, user_id: Snowflake) -> ServiceResult<()> {
        if user_id == self.self_member.user_id {
            return self.require(Permissions::CHANGE_NICKNAME);
        }
        let target = self.ctx.member(&self.guild, user_id)?;
        self.require_outranks(&target)?;
        self.require(Permissions::MANAGE_NICKNAMES)
    }

    #[instrument(skip(self), fields(guild_id = %self.guild_id()))]
    pub fn check_role_delete(&self, role_id: Snowflake) -> ServiceResult<()> {
        let role = self.role(role_id)?;
        if role.is_public() {
            return Err(ServiceError::illegal_argument("Cannot delete the public role"));
        }
        if role.managed {
            return Err(ServiceError::illegal_argument(
                "Cannot delete a role managed by an integration",
            ));
        }
        self.require(Permissions::MANAGE_ROLES)?;
        self.require_outranks_role(&role)
    }

    /// Moving a role requires outranking it
    #[instrument(skip(self), fields(guild_id = %self.guild_id()))]
    pub fn check_role_position(&self, role_id: Snowflake) -> ServiceResult<()> {
        let role = self.role(role_id)?;
        if role.is_public() {
            return Err(ServiceError::illegal_argument("Cannot move the public role"));
        }
        self.require(Permissions::MANAGE_ROLES)?;
        self.require_outranks_role(&role)
    }

    /// Adding or removing a role on a member
    #[instrument(skip(self), fields(guild_id = %self.guild_id()))]
    pub fn check_role_assign(&self, user_id: Snowflake, role_id: Snowflake) -> ServiceResult<()> {
        let role = self.role(role_id)?;
        if role.is_public() {
            return Err(ServiceError::illegal_argument(
                "Cannot add or remove the public role of a member",
            ));
        }
        if role.managed {
            return Err(ServiceError::illegal_argument(
                "Cannot add or remove a role managed by an integration",
            ));
        }
        self.ctx.member(&self.guild, user_id)?;
        self.require(Permissions::MANAGE_ROLES)?;
        self.require_outranks_role(&role)
    }
}
