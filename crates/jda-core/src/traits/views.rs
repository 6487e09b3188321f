//! Guild view - the read side of a cached guild
//!
//! Permission and hierarchy computations only need role lookups and guild
//! ownership. Keeping them behind this trait lets the resolver run against
//! any guild source.

use std::sync::Arc;

use crate::entities::{Member, Role};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for view lookups
pub type ViewResult<T> = Result<T, DomainError>;

pub trait GuildView: Send + Sync {
    fn guild_id(&self) -> Snowflake;

    fn owner_id(&self) -> Snowflake;

    /// Find a role of this guild by ID
    fn role(&self, role_id: Snowflake) -> Option<Arc<Role>>;

    /// The public role; every guild has exactly one
    fn public_role(&self) -> ViewResult<Arc<Role>> {
        let guild_id = self.guild_id();
        self.role(guild_id)
            .ok_or(DomainError::MissingPublicRole(guild_id))
    }

    /// Check if a user owns this guild
    fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id() == user_id
    }

    /// Explicit roles of a member, most senior first
    ///
    /// Unknown role IDs and the public role are skipped.
    fn member_roles(&self, member: &Member) -> Vec<Arc<Role>> {
        let mut roles: Vec<Arc<Role>> = member
            .role_ids
            .iter()
            .filter_map(|&id| self.role(id))
            .filter(|role| !role.is_public())
            .collect();
        roles.sort_by(|a, b| Role::senior_first(a, b));
        roles
    }
}
