//! Guild entity - metadata of a guild the client can see

use crate::value_objects::Snowflake;

/// Guild (server) metadata
///
/// Roles, channels and members live in the guild's cache, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
    pub owner_id: Snowflake,
    pub member_count: u32,
}

impl Guild {
    /// Create a new Guild
    pub fn new(id: Snowflake, name: String, owner_id: Snowflake) -> Self {
        Self {
            id,
            name,
            owner_id,
            member_count: 0,
        }
    }

    /// ID of the public role, which always equals the guild ID
    #[inline]
    pub fn public_role_id(&self) -> Snowflake {
        self.id
    }

    /// Check if a user is the guild owner
    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }

    /// Update the guild name
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Transfer ownership to another user
    pub fn transfer_ownership(&mut self, new_owner_id: Snowflake) {
        self.owner_id = new_owner_id;
    }
}
