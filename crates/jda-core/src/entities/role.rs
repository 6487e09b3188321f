//! Role entity - represents a guild role with permissions

use std::cmp::Ordering;

use crate::error::DomainError;
use crate::value_objects::{Permissions, Snowflake};

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    pub color: u32,
    pub hoisted: bool,
    /// Raw position as sent by the platform; higher is more senior
    pub position_raw: i32,
    pub permissions: Permissions,
    /// Managed by an integration and not assignable by hand
    pub managed: bool,
    pub mentionable: bool,
}

impl Role {
    /// Create a new Role
    pub fn new(id: Snowflake, guild_id: Snowflake, name: String, permissions: Permissions) -> Self {
        Self {
            id,
            guild_id,
            name,
            color: 0,
            hoisted: false,
            position_raw: 0,
            permissions,
            managed: false,
            mentionable: false,
        }
    }

    /// Create the public (@everyone) role for a guild
    pub fn public(guild_id: Snowflake, permissions: Permissions) -> Self {
        Self::new(guild_id, guild_id, "@everyone".to_string(), permissions)
    }

    /// The public role shares its ID with the guild
    #[inline]
    pub fn is_public(&self) -> bool {
        self.id == self.guild_id
    }

    /// Check if this role grants a specific permission
    #[inline]
    pub fn has_permission(&self, permission: Permissions) -> bool {
        self.permissions.has(permission)
    }

    /// Hierarchy order between two roles assumed to share a guild
    ///
    /// `Greater` means `self` is senior. The public role is always lowest;
    /// otherwise the higher raw position wins and equal positions go to the
    /// older role.
    pub fn cmp_hierarchy(&self, other: &Role) -> Ordering {
        if self.id == other.id {
            return Ordering::Equal;
        }
        match (self.is_public(), other.is_public()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        self.position_raw
            .cmp(&other.position_raw)
            .then_with(|| other.id.cmp(&self.id))
    }

    /// Hierarchy order, rejecting roles from different guilds
    pub fn compare_hierarchy(&self, other: &Role) -> Result<Ordering, DomainError> {
        if self.guild_id != other.guild_id {
            return Err(DomainError::CrossGuild {
                left: self.guild_id,
                right: other.guild_id,
            });
        }
        Ok(self.cmp_hierarchy(other))
    }

    /// Store order: most senior role first
    pub fn senior_first(a: &Role, b: &Role) -> Ordering {
        b.cmp_hierarchy(a)
    }

    /// Get the color as a hex string (without #)
    pub fn color_hex(&self) -> String {
        format!("{:06x}", self.color)
    }
}
