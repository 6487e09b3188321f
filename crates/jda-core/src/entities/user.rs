//! User entity - a platform account the client has seen

use crate::value_objects::Snowflake;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub name: String,
    pub global_name: Option<String>,
    pub bot: bool,
}

impl User {
    /// Create a new User
    pub fn new(id: Snowflake, name: String) -> Self {
        Self {
            id,
            name,
            global_name: None,
            bot: false,
        }
    }

    /// Global display name if set, otherwise the account name
    pub fn effective_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.name)
    }
}
