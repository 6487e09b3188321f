//! Member entity - represents a user's membership in a guild

use chrono::{DateTime, Utc};

use super::VoiceState;
use crate::value_objects::Snowflake;

/// Guild member (junction between User and Guild)
///
/// `role_ids` lists explicit roles only; the public role is implied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub nickname: Option<String>,
    pub role_ids: Vec<Snowflake>,
    pub joined_at: Option<DateTime<Utc>>,
    pub voice_state: Option<VoiceState>,
}

impl Member {
    /// Create a new Member with no explicit roles
    pub fn new(guild_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            guild_id,
            user_id,
            nickname: None,
            role_ids: Vec::new(),
            joined_at: None,
            voice_state: None,
        }
    }

    /// Builder-style role assignment
    pub fn with_roles(mut self, role_ids: impl IntoIterator<Item = Snowflake>) -> Self {
        self.set_roles(role_ids.into_iter().collect());
        self
    }

    /// Get display name (nickname if set, otherwise fallback)
    pub fn display_name<'a>(&'a self, username: &'a str) -> &'a str {
        self.nickname.as_deref().unwrap_or(username)
    }

    /// Check if member has a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Add a role to the member
    pub fn add_role(&mut self, role_id: Snowflake) {
        if !self.has_role(role_id) {
            self.role_ids.push(role_id);
        }
    }

    /// Remove a role from the member, returning whether it was held
    pub fn remove_role(&mut self, role_id: Snowflake) -> bool {
        if let Some(pos) = self.role_ids.iter().position(|&id| id == role_id) {
            self.role_ids.remove(pos);
            true
        } else {
            false
        }
    }

    /// Set the member's roles (replaces all existing roles, drops duplicates)
    pub fn set_roles(&mut self, role_ids: Vec<Snowflake>) {
        self.role_ids.clear();
        for role_id in role_ids {
            self.add_role(role_id);
        }
    }

    /// Update the member's nickname
    pub fn set_nickname(&mut self, nickname: Option<String>) {
        self.nickname = nickname;
    }

    /// Get number of explicit roles
    #[inline]
    pub fn role_count(&self) -> usize {
        self.role_ids.len()
    }

    /// Voice channel the member is connected to, if any
    pub fn voice_channel_id(&self) -> Option<Snowflake> {
        self.voice_state.and_then(|state| state.channel_id)
    }
}
