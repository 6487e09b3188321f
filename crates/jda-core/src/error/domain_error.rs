//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Role not found: {0}")]
    RoleNotFound(Snowflake),

    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Member {user_id} not found in guild {guild_id}")]
    MemberNotFound {
        guild_id: Snowflake,
        user_id: Snowflake,
    },

    // =========================================================================
    // Illegal Arguments
    // =========================================================================
    #[error("Entities from different guilds cannot be compared ({left} and {right})")]
    CrossGuild { left: Snowflake, right: Snowflake },

    #[error("Override holder {holder_id} does not belong to guild {guild_id}")]
    ForeignHolder {
        holder_id: Snowflake,
        guild_id: Snowflake,
    },

    #[error("Channel {0} cannot hold permission overrides")]
    NotPermissionContainer(Snowflake),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    // =========================================================================
    // Invariant Violations
    // =========================================================================
    #[error("Guild {0} has no public role")]
    MissingPublicRole(Snowflake),

    #[error("Cannot delete the public role of guild {0}")]
    CannotDeletePublicRole(Snowflake),

    #[error("{kind} {id} is detached from the cache")]
    Detached { kind: &'static str, id: Snowflake },
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::MemberNotFound { .. } => "UNKNOWN_MEMBER",

            // Illegal arguments
            Self::CrossGuild { .. } => "CROSS_GUILD",
            Self::ForeignHolder { .. } => "FOREIGN_HOLDER",
            Self::NotPermissionContainer(_) => "NOT_PERMISSION_CONTAINER",
            Self::InvalidSnapshot(_) => "INVALID_SNAPSHOT",

            // Invariants
            Self::MissingPublicRole(_) => "MISSING_PUBLIC_ROLE",
            Self::CannotDeletePublicRole(_) => "CANNOT_DELETE_PUBLIC_ROLE",
            Self::Detached { .. } => "DETACHED_ENTITY",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GuildNotFound(_)
                | Self::ChannelNotFound(_)
                | Self::RoleNotFound(_)
                | Self::UserNotFound(_)
                | Self::MemberNotFound { .. }
        )
    }

    /// Check if this error reports a malformed argument
    pub fn is_illegal_argument(&self) -> bool {
        matches!(
            self,
            Self::CrossGuild { .. }
                | Self::ForeignHolder { .. }
                | Self::NotPermissionContainer(_)
                | Self::InvalidSnapshot(_)
                | Self::CannotDeletePublicRole(_)
        )
    }
}
