//! Thread channels
//!
//! Threads have no overrides of their own and no sidebar position; access is
//! decided by the parent channel.

use super::{Channel, ChannelType, MessageChannel};
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadChannel {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub kind: ChannelType,
    pub name: String,
    /// Channel the thread was started in
    pub parent_id: Snowflake,
    pub owner_id: Option<Snowflake>,
    pub archived: bool,
    pub locked: bool,
    pub slowmode: u32,
    /// Copied from the parent channel
    pub nsfw: bool,
}

impl ThreadChannel {
    pub fn new(
        id: Snowflake,
        guild_id: Snowflake,
        kind: ChannelType,
        name: String,
        parent_id: Snowflake,
    ) -> Self {
        Self {
            id,
            guild_id,
            kind,
            name,
            parent_id,
            owner_id: None,
            archived: false,
            locked: false,
            slowmode: 0,
            nsfw: false,
        }
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        self.kind == ChannelType::PrivateThread
    }
}

impl Channel for ThreadChannel {
    fn id(&self) -> Snowflake {
        self.id
    }

    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn kind(&self) -> ChannelType {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl MessageChannel for ThreadChannel {
    fn slowmode(&self) -> u32 {
        self.slowmode
    }

    fn is_nsfw(&self) -> bool {
        self.nsfw
    }
}
