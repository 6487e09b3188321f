//! Service layer error types
//!
//! Pre-flight checks fail with one of these before any request is built.

use std::fmt;

use jda_core::{DomainError, Permissions, Snowflake};

/// The acting member lacks a permission
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    #[error("Cannot perform action due to a lack of Permission. Missing permission: {}", permission_name(.permission))]
    Insufficient {
        guild_id: Snowflake,
        /// `None` for guild-level checks
        channel_id: Option<Snowflake>,
        permission: Permissions,
    },
}

impl PermissionError {
    pub fn insufficient(guild_id: Snowflake, channel_id: Option<Snowflake>, permission: Permissions) -> Self {
        Self::Insufficient {
            guild_id,
            channel_id,
            permission,
        }
    }

    /// The missing permission
    pub fn permission(&self) -> Permissions {
        match self {
            Self::Insufficient { permission, .. } => *permission,
        }
    }
}

fn permission_name(permission: &Permissions) -> String {
    let names = permission.names();
    if names.is_empty() {
        permission.to_string()
    } else {
        names.join(", ")
    }
}

/// The acting member does not outrank its target
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("Can't modify a member with higher or equal highest role than yourself")]
    Member {
        guild_id: Snowflake,
        target_id: Snowflake,
    },

    #[error("Can't modify a role with higher or equal highest role than yourself")]
    Role {
        guild_id: Snowflake,
        role_id: Snowflake,
    },
}

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Missing permission
    Permission(PermissionError),

    /// Hierarchy violation
    Hierarchy(HierarchyError),

    /// Resource not found in the cache
    NotFound { resource: &'static str, id: String },

    /// Request that can never succeed
    IllegalArgument(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Permission(e) => write!(f, "{e}"),
            Self::Hierarchy(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::IllegalArgument(msg) => write!(f, "Illegal argument: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Permission(e) => Some(e),
            Self::Hierarchy(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create an illegal argument error
    pub fn illegal_argument(msg: impl Into<String>) -> Self {
        Self::IllegalArgument(msg.into())
    }

    /// Create an insufficient permission error
    pub fn insufficient(guild_id: Snowflake, channel_id: Option<Snowflake>, permission: Permissions) -> Self {
        Self::Permission(PermissionError::insufficient(guild_id, channel_id, permission))
    }

    /// Check if the acting member lacked a permission or rank
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::Permission(_) | Self::Hierarchy(_))
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_not_found(),
            Self::NotFound { .. } => true,
            _ => false,
        }
    }

    /// Check if the request was malformed
    pub fn is_illegal_argument(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_illegal_argument(),
            Self::IllegalArgument(_) => true,
            _ => false,
        }
    }

    /// Get a stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Permission(_) => "MISSING_PERMISSIONS",
            Self::Hierarchy(_) => "HIERARCHY",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::IllegalArgument(_) => "ILLEGAL_ARGUMENT",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<PermissionError> for ServiceError {
    fn from(err: PermissionError) -> Self {
        Self::Permission(err)
    }
}

impl From<HierarchyError> for ServiceError {
    fn from(err: HierarchyError) -> Self {
        Self::Hierarchy(err)
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
