//! Permission override - per-channel allow/deny adjustment for a role or member

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{Permissions, Snowflake};

/// Kind of entity an override applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum OverrideHolder {
    Role = 0,
    Member = 1,
}

impl TryFrom<u8> for OverrideHolder {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Role),
            1 => Ok(Self::Member),
            other => Err(DomainError::InvalidSnapshot(format!(
                "unknown override holder type {other}"
            ))),
        }
    }
}

impl From<OverrideHolder> for u8 {
    fn from(holder: OverrideHolder) -> Self {
        holder as u8
    }
}

/// Allow/deny pair for one holder on one channel
///
/// `allow` and `deny` never share a bit. Overlapping input is corrected in
/// favour of `allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionOverride {
    channel_id: Snowflake,
    holder_id: Snowflake,
    holder: OverrideHolder,
    allow: Permissions,
    deny: Permissions,
}

impl PermissionOverride {
    /// Create an override, clearing denied bits that are also allowed
    pub fn new(
        channel_id: Snowflake,
        holder_id: Snowflake,
        holder: OverrideHolder,
        allow: Permissions,
        deny: Permissions,
    ) -> Self {
        Self {
            channel_id,
            holder_id,
            holder,
            allow,
            deny: deny.difference(allow),
        }
    }

    /// Override held by a role
    pub fn role(channel_id: Snowflake, role_id: Snowflake, allow: Permissions, deny: Permissions) -> Self {
        Self::new(channel_id, role_id, OverrideHolder::Role, allow, deny)
    }

    /// Override held by a member
    pub fn member(channel_id: Snowflake, user_id: Snowflake, allow: Permissions, deny: Permissions) -> Self {
        Self::new(channel_id, user_id, OverrideHolder::Member, allow, deny)
    }

    /// Empty override, used as the starting point of an outbound edit
    pub fn empty(channel_id: Snowflake, holder_id: Snowflake, holder: OverrideHolder) -> Self {
        Self::new(channel_id, holder_id, holder, Permissions::empty(), Permissions::empty())
    }

    #[inline]
    pub fn channel_id(&self) -> Snowflake {
        self.channel_id
    }

    #[inline]
    pub fn holder_id(&self) -> Snowflake {
        self.holder_id
    }

    #[inline]
    pub fn holder(&self) -> OverrideHolder {
        self.holder
    }

    #[inline]
    pub fn allowed(&self) -> Permissions {
        self.allow
    }

    #[inline]
    pub fn denied(&self) -> Permissions {
        self.deny
    }

    /// Known permissions neither allowed nor denied
    pub fn inherited(&self) -> Permissions {
        Permissions::all().difference(self.allow.union(self.deny))
    }

    #[inline]
    pub fn is_role_override(&self) -> bool {
        self.holder == OverrideHolder::Role
    }

    #[inline]
    pub fn is_member_override(&self) -> bool {
        self.holder == OverrideHolder::Member
    }

    /// Replace the allowed set; newly allowed bits leave `deny`
    #[must_use]
    pub fn set_allow(mut self, allow: Permissions) -> Self {
        self.allow = allow;
        self.deny = self.deny.difference(allow);
        self
    }

    /// Replace the denied set; bits already allowed stay allowed
    #[must_use]
    pub fn set_deny(mut self, deny: Permissions) -> Self {
        self.deny = deny.difference(self.allow);
        self
    }

    /// Allow permissions, removing them from `deny`
    #[must_use]
    pub fn grant(mut self, permissions: Permissions) -> Self {
        self.allow = self.allow.union(permissions);
        self.deny = self.deny.difference(permissions);
        self
    }

    /// Deny permissions, removing them from `allow`
    #[must_use]
    pub fn deny_permissions(mut self, permissions: Permissions) -> Self {
        self.deny = self.deny.union(permissions);
        self.allow = self.allow.difference(permissions);
        self
    }

    /// Reset permissions to inherited
    #[must_use]
    pub fn clear(mut self, permissions: Permissions) -> Self {
        self.allow = self.allow.difference(permissions);
        self.deny = self.deny.difference(permissions);
        self
    }

    /// Apply this override on top of a base permission set
    #[inline]
    pub fn apply_to(&self, base: Permissions) -> Permissions {
        base.difference(self.deny).union(self.allow)
    }
}
