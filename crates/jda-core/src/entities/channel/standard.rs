//! Standard guild channels - the ones that carry permission overrides

use super::{
    BitrateLimited, Categorizable, Channel, ChannelType, MessageChannel, PermissionContainer,
    Positioned,
};
use crate::entities::PermissionOverride;
use crate::store::SnowflakeStore;
use crate::value_objects::Snowflake;

/// Fields shared by every standard guild channel
#[derive(Debug)]
pub struct ChannelBase {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub kind: ChannelType,
    pub name: String,
    pub position_raw: i32,
    /// Category the channel sits under
    pub parent_id: Option<Snowflake>,
    pub overrides: SnowflakeStore<PermissionOverride>,
}

impl ChannelBase {
    pub fn new(id: Snowflake, guild_id: Snowflake, kind: ChannelType, name: String) -> Self {
        Self {
            id,
            guild_id,
            kind,
            name,
            position_raw: 0,
            parent_id: None,
            overrides: SnowflakeStore::new(),
        }
    }

    pub fn with_position(mut self, position_raw: i32) -> Self {
        self.position_raw = position_raw;
        self
    }

    pub fn with_parent(mut self, parent_id: Option<Snowflake>) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Add overrides, keyed by holder
    pub fn with_overrides(self, overrides: impl IntoIterator<Item = PermissionOverride>) -> Self {
        for ov in overrides {
            self.overrides.put(ov.holder_id(), ov);
        }
        self
    }
}

/// Text or announcement channel
#[derive(Debug)]
pub struct TextChannel {
    pub base: ChannelBase,
    pub topic: Option<String>,
    pub nsfw: bool,
    pub slowmode: u32,
}

impl TextChannel {
    pub fn new(base: ChannelBase) -> Self {
        Self {
            base,
            topic: None,
            nsfw: false,
            slowmode: 0,
        }
    }

    #[inline]
    pub fn is_announcement(&self) -> bool {
        self.base.kind == ChannelType::Announcement
    }
}

/// Voice or stage channel
#[derive(Debug)]
pub struct VoiceChannel {
    pub base: ChannelBase,
    pub bitrate: u32,
    pub user_limit: u32,
    pub nsfw: bool,
    pub slowmode: u32,
}

impl VoiceChannel {
    pub fn new(base: ChannelBase) -> Self {
        Self {
            base,
            bitrate: 64_000,
            user_limit: 0,
            nsfw: false,
            slowmode: 0,
        }
    }

    #[inline]
    pub fn is_stage(&self) -> bool {
        self.base.kind == ChannelType::Stage
    }
}

/// Category grouping other channels
#[derive(Debug)]
pub struct CategoryChannel {
    pub base: ChannelBase,
}

impl CategoryChannel {
    pub fn new(base: ChannelBase) -> Self {
        Self { base }
    }
}

/// Forum or media channel; posts are threads
#[derive(Debug)]
pub struct ForumChannel {
    pub base: ChannelBase,
    pub topic: Option<String>,
    pub nsfw: bool,
    /// Slowmode applied to new posts
    pub default_thread_slowmode: u32,
}

impl ForumChannel {
    pub fn new(base: ChannelBase) -> Self {
        Self {
            base,
            topic: None,
            nsfw: false,
            default_thread_slowmode: 0,
        }
    }
}

macro_rules! impl_standard_channel {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Channel for $ty {
                fn id(&self) -> Snowflake {
                    self.base.id
                }

                fn guild_id(&self) -> Snowflake {
                    self.base.guild_id
                }

                fn kind(&self) -> ChannelType {
                    self.base.kind
                }

                fn name(&self) -> &str {
                    &self.base.name
                }
            }

            impl PermissionContainer for $ty {
                fn overrides(&self) -> &SnowflakeStore<PermissionOverride> {
                    &self.base.overrides
                }
            }

            impl Positioned for $ty {
                fn position_raw(&self) -> i32 {
                    self.base.position_raw
                }
            }
        )+
    };
}

impl_standard_channel!(TextChannel, VoiceChannel, CategoryChannel, ForumChannel);

macro_rules! impl_categorizable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Categorizable for $ty {
                fn parent_category_id(&self) -> Option<Snowflake> {
                    self.base.parent_id
                }
            }
        )+
    };
}

impl_categorizable!(TextChannel, VoiceChannel, ForumChannel);

impl MessageChannel for TextChannel {
    fn slowmode(&self) -> u32 {
        self.slowmode
    }

    fn is_nsfw(&self) -> bool {
        self.nsfw
    }
}

impl MessageChannel for VoiceChannel {
    fn slowmode(&self) -> u32 {
        self.slowmode
    }

    fn is_nsfw(&self) -> bool {
        self.nsfw
    }
}

impl BitrateLimited for VoiceChannel {
    fn bitrate(&self) -> u32 {
        self.bitrate
    }

    fn user_limit(&self) -> u32 {
        self.user_limit
    }
}
