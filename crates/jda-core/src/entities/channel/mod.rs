//! Guild channels
//!
//! Concrete channel variants compose the capability traits they support.
//! [`GuildChannel`] wraps them for storage in a single cache.

mod capabilities;
mod kind;
mod standard;
mod thread;

use std::cmp::Ordering;

pub use capabilities::{
    cmp_position, BitrateLimited, Categorizable, Channel, MessageChannel, PermissionContainer,
    Positioned,
};
pub use kind::ChannelType;
pub use standard::{CategoryChannel, ChannelBase, ForumChannel, TextChannel, VoiceChannel};
pub use thread::ThreadChannel;

use crate::value_objects::Snowflake;

/// Any channel that belongs to a guild
#[derive(Debug)]
pub enum GuildChannel {
    Text(TextChannel),
    Voice(VoiceChannel),
    Category(CategoryChannel),
    Forum(ForumChannel),
    Thread(ThreadChannel),
}

impl GuildChannel {
    fn as_channel(&self) -> &dyn Channel {
        match self {
            Self::Text(c) => c,
            Self::Voice(c) => c,
            Self::Category(c) => c,
            Self::Forum(c) => c,
            Self::Thread(c) => c,
        }
    }

    /// Channel with its own overrides; `None` for threads
    pub fn as_permission_container(&self) -> Option<&dyn PermissionContainer> {
        match self {
            Self::Text(c) => Some(c),
            Self::Voice(c) => Some(c),
            Self::Category(c) => Some(c),
            Self::Forum(c) => Some(c),
            Self::Thread(_) => None,
        }
    }

    /// Sidebar-listed channel; `None` for threads
    pub fn as_positioned(&self) -> Option<&dyn Positioned> {
        match self {
            Self::Text(c) => Some(c),
            Self::Voice(c) => Some(c),
            Self::Category(c) => Some(c),
            Self::Forum(c) => Some(c),
            Self::Thread(_) => None,
        }
    }

    pub fn as_message_channel(&self) -> Option<&dyn MessageChannel> {
        match self {
            Self::Text(c) => Some(c),
            Self::Voice(c) => Some(c),
            Self::Thread(c) => Some(c),
            Self::Category(_) | Self::Forum(_) => None,
        }
    }

    pub fn as_thread(&self) -> Option<&ThreadChannel> {
        match self {
            Self::Thread(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn is_thread(&self) -> bool {
        matches!(self, Self::Thread(_))
    }

    /// Parent category for standard channels, parent channel for threads
    pub fn parent_id(&self) -> Option<Snowflake> {
        match self {
            Self::Text(c) => c.parent_category_id(),
            Self::Voice(c) => c.parent_category_id(),
            Self::Forum(c) => c.parent_category_id(),
            Self::Category(_) => None,
            Self::Thread(t) => Some(t.parent_id),
        }
    }

    /// Cache iteration order: sidebar order, threads last by ID
    pub fn display_order(a: &GuildChannel, b: &GuildChannel) -> Ordering {
        match (a.as_positioned(), b.as_positioned()) {
            (Some(a), Some(b)) => cmp_position(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.id().cmp(&b.id()),
        }
    }
}

impl Channel for GuildChannel {
    fn id(&self) -> Snowflake {
        self.as_channel().id()
    }

    fn guild_id(&self) -> Snowflake {
        self.as_channel().guild_id()
    }

    fn kind(&self) -> ChannelType {
        self.as_channel().kind()
    }

    fn name(&self) -> &str {
        self.as_channel().name()
    }
}
