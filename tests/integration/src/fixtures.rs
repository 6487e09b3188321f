//! Test fixtures and data generators
//!
//! Provides one reusable guild layout for integration tests:
//!
//! | ID   | Entity                                                  |
//! |------|---------------------------------------------------------|
//! | 1    | the client's own user                                   |
//! | 2    | guild owner                                             |
//! | 3, 4 | plain users                                             |
//! | 1000 | guild, and its public role                              |
//! | 2xxx | roles                                                   |
//! | 3xxx | channels                                                |

use jda_cache::{ChannelData, GuildSnapshot, MemberData, OverrideData, RoleData, UserData, VoiceStateData};
use jda_core::{ChannelType, OverrideHolder, Permissions, Snowflake, User, VoiceState};

pub const GUILD_ID: Snowflake = Snowflake::new(1000);
pub const SELF_USER: Snowflake = Snowflake::new(1);
pub const OWNER: Snowflake = Snowflake::new(2);
pub const ALICE: Snowflake = Snowflake::new(3);
pub const BOB: Snowflake = Snowflake::new(4);

pub const MEMBER_ROLE: Snowflake = Snowflake::new(2001);
pub const MOD_ROLE: Snowflake = Snowflake::new(2002);
pub const ADMIN_ROLE: Snowflake = Snowflake::new(2003);
pub const MANAGED_ROLE: Snowflake = Snowflake::new(2004);

pub const CATEGORY: Snowflake = Snowflake::new(3000);
pub const TEXT: Snowflake = Snowflake::new(3001);
pub const VOICE: Snowflake = Snowflake::new(3002);
pub const THREAD: Snowflake = Snowflake::new(3003);

/// The client's own user
pub fn self_user() -> User {
    User {
        bot: true,
        ..User::new(SELF_USER, "permission-bot".to_string())
    }
}

pub fn role_data(id: Snowflake, position: i32, permissions: Permissions) -> RoleData {
    RoleData {
        id,
        name: format!("role-{id}"),
        color: 0,
        hoist: false,
        position,
        permissions,
        managed: false,
        mentionable: false,
    }
}

pub fn role_override(role_id: Snowflake, allow: Permissions, deny: Permissions) -> OverrideData {
    OverrideData {
        id: role_id,
        holder: OverrideHolder::Role,
        allow,
        deny,
    }
}

pub fn member_override(user_id: Snowflake, allow: Permissions, deny: Permissions) -> OverrideData {
    OverrideData {
        id: user_id,
        holder: OverrideHolder::Member,
        allow,
        deny,
    }
}

/// Channel payload with every optional field left empty
pub fn channel_data(id: Snowflake, kind: ChannelType, overrides: Vec<OverrideData>) -> ChannelData {
    ChannelData {
        id,
        kind,
        guild_id: Some(GUILD_ID),
        name: format!("channel-{id}"),
        position: 0,
        parent_id: None,
        permission_overwrites: overrides,
        topic: None,
        nsfw: false,
        rate_limit_per_user: 0,
        bitrate: None,
        user_limit: None,
        owner_id: None,
        thread_metadata: None,
    }
}

pub fn text_channel(id: Snowflake, overrides: Vec<OverrideData>) -> ChannelData {
    channel_data(id, ChannelType::Text, overrides)
}

pub fn voice_channel(id: Snowflake, overrides: Vec<OverrideData>) -> ChannelData {
    channel_data(id, ChannelType::Voice, overrides)
}

pub fn thread_data(id: Snowflake, parent_id: Snowflake) -> ChannelData {
    ChannelData {
        parent_id: Some(parent_id),
        owner_id: Some(ALICE),
        ..channel_data(id, ChannelType::PublicThread, Vec::new())
    }
}

pub fn member_data(user_id: Snowflake, roles: &[Snowflake]) -> MemberData {
    MemberData {
        user: UserData {
            id: user_id,
            username: format!("user{user_id}"),
            global_name: None,
            bot: user_id == SELF_USER,
        },
        nick: None,
        roles: roles.to_vec(),
        joined_at: None,
    }
}

/// Builder for a guild snapshot
///
/// Starts with the public role and the owner as the only member.
#[derive(Debug, Clone)]
pub struct GuildFixture {
    snapshot: GuildSnapshot,
}

impl GuildFixture {
    pub fn new(public: Permissions) -> Self {
        Self {
            snapshot: GuildSnapshot {
                id: GUILD_ID,
                name: "Fixture Guild".to_string(),
                owner_id: OWNER,
                member_count: None,
                roles: vec![role_data(GUILD_ID, 0, public)],
                channels: Vec::new(),
                threads: Vec::new(),
                members: vec![member_data(OWNER, &[])],
                voice_states: Vec::new(),
            },
        }
    }

    /// The layout most tests share
    ///
    /// Roles by seniority: admin, mod, managed, member. The client holds the
    /// mod role, Alice the member role, Bob nothing.
    pub fn standard() -> Self {
        Self::new(Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES | Permissions::CONNECT)
            .role(MEMBER_ROLE, 1, Permissions::ATTACH_FILES)
            .managed_role(MANAGED_ROLE, 2)
            .role(
                MOD_ROLE,
                5,
                Permissions::KICK_MEMBERS
                    | Permissions::BAN_MEMBERS
                    | Permissions::MANAGE_ROLES
                    | Permissions::MANAGE_NICKNAMES
                    | Permissions::CHANGE_NICKNAME,
            )
            .role(ADMIN_ROLE, 10, Permissions::ADMINISTRATOR)
            .channel(channel_data(CATEGORY, ChannelType::Category, Vec::new()))
            .channel(ChannelData {
                parent_id: Some(CATEGORY),
                ..text_channel(TEXT, Vec::new())
            })
            .channel(voice_channel(VOICE, Vec::new()))
            .thread(thread_data(THREAD, TEXT))
            .member(SELF_USER, &[MOD_ROLE])
            .member(ALICE, &[MEMBER_ROLE])
            .member(BOB, &[])
    }

    pub fn role(mut self, id: Snowflake, position: i32, permissions: Permissions) -> Self {
        self.snapshot.roles.push(role_data(id, position, permissions));
        self
    }

    pub fn managed_role(mut self, id: Snowflake, position: i32) -> Self {
        self.snapshot.roles.push(RoleData {
            managed: true,
            ..role_data(id, position, Permissions::empty())
        });
        self
    }

    pub fn channel(mut self, data: ChannelData) -> Self {
        self.snapshot.channels.push(data);
        self
    }

    pub fn thread(mut self, data: ChannelData) -> Self {
        self.snapshot.threads.push(data);
        self
    }

    /// Add a member, replacing any earlier entry for the same user
    pub fn member(mut self, user_id: Snowflake, roles: &[Snowflake]) -> Self {
        self.snapshot.members.retain(|m| m.user_id() != user_id);
        self.snapshot.members.push(member_data(user_id, roles));
        self
    }

    pub fn voice_state(mut self, user_id: Snowflake, channel_id: Snowflake) -> Self {
        self.snapshot.voice_states.push(VoiceStateData {
            user_id,
            state: VoiceState {
                channel_id: Some(channel_id),
                ..VoiceState::default()
            },
        });
        self
    }

    /// Replace the overrides of a channel already in the fixture
    pub fn overrides(mut self, channel_id: Snowflake, overrides: Vec<OverrideData>) -> Self {
        for channel in &mut self.snapshot.channels {
            if channel.id == channel_id {
                channel.permission_overwrites.clone_from(&overrides);
            }
        }
        self
    }

    pub fn build(self) -> GuildSnapshot {
        self.snapshot
    }
}
