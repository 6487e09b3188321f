//! Inbound snapshots - parsed payloads the event layer hands to the cache
//!
//! Only the fields the permission core needs are modelled. Field names follow
//! the platform's JSON so payloads deserialize directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jda_core::entities::channel::{
    CategoryChannel, ChannelBase, ForumChannel, TextChannel, ThreadChannel, VoiceChannel,
};
use jda_core::{
    ChannelType, DomainError, GuildChannel, Member, OverrideHolder, PermissionOverride,
    Permissions, Role, Snowflake, User, VoiceState,
};

/// Full guild payload, sent when a guild becomes available
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildSnapshot {
    pub id: Snowflake,
    pub name: String,
    pub owner_id: Snowflake,
    #[serde(default)]
    pub member_count: Option<u32>,
    #[serde(default)]
    pub roles: Vec<RoleData>,
    #[serde(default)]
    pub channels: Vec<ChannelData>,
    #[serde(default)]
    pub threads: Vec<ChannelData>,
    #[serde(default)]
    pub members: Vec<MemberData>,
    #[serde(default)]
    pub voice_states: Vec<VoiceStateData>,
}

/// Partial guild update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildUpdate {
    pub id: Snowflake,
    pub name: String,
    pub owner_id: Snowflake,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleData {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub position: i32,
    pub permissions: Permissions,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
}

impl RoleData {
    pub fn into_role(self, guild_id: Snowflake) -> Role {
        Role {
            id: self.id,
            guild_id,
            name: self.name,
            color: self.color,
            hoisted: self.hoist,
            position_raw: self.position,
            permissions: self.permissions,
            managed: self.managed,
            mentionable: self.mentionable,
        }
    }
}

/// One entry of a channel's `permission_overwrites`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OverrideData {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub holder: OverrideHolder,
    #[serde(default)]
    pub allow: Permissions,
    #[serde(default)]
    pub deny: Permissions,
}

impl OverrideData {
    pub fn into_override(self, channel_id: Snowflake) -> PermissionOverride {
        PermissionOverride::new(channel_id, self.id, self.holder, self.allow, self.deny)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ThreadMetadata {
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub locked: bool,
}

/// Guild channel or thread payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelData {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: ChannelType,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub parent_id: Option<Snowflake>,
    #[serde(default)]
    pub permission_overwrites: Vec<OverrideData>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    pub rate_limit_per_user: u32,
    #[serde(default)]
    pub bitrate: Option<u32>,
    #[serde(default)]
    pub user_limit: Option<u32>,
    #[serde(default)]
    pub owner_id: Option<Snowflake>,
    #[serde(default)]
    pub thread_metadata: Option<ThreadMetadata>,
}

impl ChannelData {
    /// Build the channel, keeping only the overrides `keep` accepts
    pub fn into_channel<F>(self, guild_id: Snowflake, mut keep: F) -> Result<GuildChannel, DomainError>
    where
        F: FnMut(&OverrideData) -> bool,
    {
        let ChannelData {
            id,
            kind,
            name,
            position,
            parent_id,
            permission_overwrites,
            topic,
            nsfw,
            rate_limit_per_user,
            bitrate,
            user_limit,
            owner_id,
            thread_metadata,
            ..
        } = self;

        let base = move |name: String| {
            let overrides: Vec<PermissionOverride> = permission_overwrites
                .into_iter()
                .filter(|ov| keep(ov))
                .map(|ov| ov.into_override(id))
                .collect();
            ChannelBase::new(id, guild_id, kind, name)
                .with_position(position)
                .with_overrides(overrides)
        };

        Ok(match kind {
            ChannelType::Text | ChannelType::Announcement => {
                let mut channel = TextChannel::new(base(name).with_parent(parent_id));
                channel.topic = topic;
                channel.nsfw = nsfw;
                channel.slowmode = rate_limit_per_user;
                GuildChannel::Text(channel)
            }
            ChannelType::Voice | ChannelType::Stage => {
                let mut channel = VoiceChannel::new(base(name).with_parent(parent_id));
                if let Some(bitrate) = bitrate {
                    channel.bitrate = bitrate;
                }
                channel.user_limit = user_limit.unwrap_or(0);
                channel.nsfw = nsfw;
                channel.slowmode = rate_limit_per_user;
                GuildChannel::Voice(channel)
            }
            ChannelType::Forum | ChannelType::Media => {
                let mut channel = ForumChannel::new(base(name).with_parent(parent_id));
                channel.topic = topic;
                channel.nsfw = nsfw;
                channel.default_thread_slowmode = rate_limit_per_user;
                GuildChannel::Forum(channel)
            }
            ChannelType::Category => GuildChannel::Category(CategoryChannel::new(base(name))),
            ChannelType::AnnouncementThread
            | ChannelType::PublicThread
            | ChannelType::PrivateThread => {
                let parent_id = parent_id.ok_or_else(|| {
                    DomainError::InvalidSnapshot(format!("thread {id} has no parent channel"))
                })?;
                let metadata = thread_metadata.unwrap_or_default();
                let mut thread = ThreadChannel::new(id, guild_id, kind, name, parent_id);
                thread.owner_id = owner_id;
                thread.archived = metadata.archived;
                thread.locked = metadata.locked;
                thread.slowmode = rate_limit_per_user;
                GuildChannel::Thread(thread)
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl UserData {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.username,
            global_name: self.global_name,
            bot: self.bot,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberData {
    pub user: UserData,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

impl MemberData {
    #[inline]
    pub fn user_id(&self) -> Snowflake {
        self.user.id
    }

    /// Split into the user and the membership
    pub fn into_parts(self, guild_id: Snowflake) -> (User, Member) {
        let mut member = Member::new(guild_id, self.user.id).with_roles(self.roles);
        member.nickname = self.nick;
        member.joined_at = self.joined_at;
        (self.user.into_user(), member)
    }
}

/// Voice state entry of a guild payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VoiceStateData {
    pub user_id: Snowflake,
    #[serde(flatten)]
    pub state: VoiceState,
}
