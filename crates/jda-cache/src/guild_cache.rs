//! Per-guild cache of roles, channels and members

use std::cmp::Ordering;
use std::sync::Arc;

use parking_lot::RwLock;

use jda_core::store::SortOrder;
use jda_core::{
    Guild, GuildChannel, GuildView, Member, Role, Snowflake, SnowflakeStore,
};

/// Build a store honouring the configured shard amount
pub(crate) fn new_store<T>(shard_amount: Option<usize>, order: Option<SortOrder<T>>) -> SnowflakeStore<T> {
    match (shard_amount, order) {
        (Some(shards), order) => SnowflakeStore::with_shards(shards, order),
        (None, Some(order)) => SnowflakeStore::with_order(order),
        (None, None) => SnowflakeStore::new(),
    }
}

/// Cached state of one guild
///
/// Roles iterate senior first, channels in sidebar order.
#[derive(Debug)]
pub struct GuildCache {
    guild: RwLock<Arc<Guild>>,
    roles: SnowflakeStore<Role>,
    channels: SnowflakeStore<GuildChannel>,
    members: SnowflakeStore<Member>,
}

impl GuildCache {
    pub(crate) fn new(guild: Guild, shard_amount: Option<usize>) -> Self {
        Self {
            guild: RwLock::new(Arc::new(guild)),
            roles: new_store(shard_amount, Some(Role::senior_first)),
            channels: new_store(shard_amount, Some(GuildChannel::display_order)),
            members: new_store(shard_amount, None),
        }
    }

    /// Current guild metadata snapshot
    pub fn guild(&self) -> Arc<Guild> {
        Arc::clone(&self.guild.read())
    }

    #[inline]
    pub fn id(&self) -> Snowflake {
        self.guild.read().id
    }

    pub fn roles(&self) -> &SnowflakeStore<Role> {
        &self.roles
    }

    pub fn channels(&self) -> &SnowflakeStore<GuildChannel> {
        &self.channels
    }

    pub fn members(&self) -> &SnowflakeStore<Member> {
        &self.members
    }

    pub fn channel(&self, channel_id: Snowflake) -> Option<Arc<GuildChannel>> {
        self.channels.get(channel_id)
    }

    pub fn member(&self, user_id: Snowflake) -> Option<Arc<Member>> {
        self.members.get(user_id)
    }

    /// Cached members holding a role
    pub fn members_with_role(&self, role_id: Snowflake) -> Vec<Arc<Member>> {
        if role_id == self.id() {
            return self.members.values();
        }
        self.members
            .values()
            .into_iter()
            .filter(|member| member.has_role(role_id))
            .collect()
    }

    /// Replace guild metadata with a modified copy
    pub(crate) fn update_guild<F>(&self, f: F) -> Arc<Guild>
    where
        F: FnOnce(&Guild) -> Guild,
    {
        let mut guard = self.guild.write();
        let next = Arc::new(f(&guard));
        *guard = Arc::clone(&next);
        next
    }

    /// Name order used by the guild list
    pub(crate) fn by_name(a: &GuildCache, b: &GuildCache) -> Ordering {
        a.guild().name.cmp(&b.guild().name)
    }
}

impl GuildView for GuildCache {
    fn guild_id(&self) -> Snowflake {
        self.id()
    }

    fn owner_id(&self) -> Snowflake {
        self.guild.read().owner_id
    }

    fn role(&self, role_id: Snowflake) -> Option<Arc<Role>> {
        self.roles.get(role_id)
    }
}
