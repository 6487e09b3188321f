//! Role and channel hierarchy checks
//!
//! Whether a member may act on another member or on a role is decided by
//! comparing highest roles. The guild owner sits above everyone.

use std::cmp::Ordering;
use std::sync::Arc;

use jda_core::entities::channel::cmp_position;
use jda_core::{DomainError, GuildView, Member, Positioned, Role, Snowflake, ViewResult};

/// Hierarchy comparisons within one guild
pub struct HierarchyGuard<'g, G: GuildView + ?Sized> {
    guild: &'g G,
}

impl<'g, G> HierarchyGuard<'g, G>
where
    G: GuildView + ?Sized,
{
    pub fn new(guild: &'g G) -> Self {
        Self { guild }
    }

    fn ensure_in_guild(&self, guild_id: Snowflake) -> ViewResult<()> {
        let own = self.guild.guild_id();
        if guild_id == own {
            Ok(())
        } else {
            Err(DomainError::CrossGuild {
                left: own,
                right: guild_id,
            })
        }
    }

    /// Compare two roles; `Greater` means `a` is senior
    pub fn compare_roles(&self, a: &Role, b: &Role) -> ViewResult<Ordering> {
        self.ensure_in_guild(a.guild_id)?;
        a.compare_hierarchy(b)
    }

    /// Check that `issuer` strictly outranks `target`
    pub fn role_can_interact(&self, issuer: &Role, target: &Role) -> ViewResult<bool> {
        Ok(self.compare_roles(issuer, target)? == Ordering::Greater)
    }

    /// Compare two channels in sidebar order; `Less` means `a` is listed first
    pub fn compare_channels(&self, a: &dyn Positioned, b: &dyn Positioned) -> ViewResult<Ordering> {
        self.ensure_in_guild(a.guild_id())?;
        self.ensure_in_guild(b.guild_id())?;
        Ok(cmp_position(a, b))
    }

    /// Explicit roles of a member, most senior first
    pub fn sorted_roles(&self, member: &Member) -> Vec<Arc<Role>> {
        self.guild.member_roles(member)
    }

    /// The member's most senior explicit role
    pub fn highest_role(&self, member: &Member) -> Option<Arc<Role>> {
        self.sorted_roles(member).into_iter().next()
    }

    /// Check whether `actor` may act on `target`
    ///
    /// Nobody can act on the owner, and a member without roles can act on
    /// nobody. Self interaction fails unless the actor owns the guild.
    pub fn can_interact(&self, actor: &Member, target: &Member) -> ViewResult<bool> {
        self.ensure_in_guild(actor.guild_id)?;
        self.ensure_in_guild(target.guild_id)?;

        if self.guild.is_owner(actor.user_id) {
            return Ok(true);
        }
        if self.guild.is_owner(target.user_id) {
            return Ok(false);
        }

        let Some(actor_top) = self.highest_role(actor) else {
            return Ok(false);
        };
        let Some(target_top) = self.highest_role(target) else {
            return Ok(true);
        };
        Ok(actor_top.cmp_hierarchy(&target_top) == Ordering::Greater)
    }

    /// Check whether `actor` may manage `role`
    pub fn can_interact_role(&self, actor: &Member, role: &Role) -> ViewResult<bool> {
        self.ensure_in_guild(actor.guild_id)?;
        self.ensure_in_guild(role.guild_id)?;

        if self.guild.is_owner(actor.user_id) {
            return Ok(true);
        }
        match self.highest_role(actor) {
            Some(top) => Ok(top.cmp_hierarchy(role) == Ordering::Greater),
            None => Ok(false),
        }
    }
}
