//! Entity cache - applies lifecycle events to the cached guild graph
//!
//! The event layer parses gateway payloads into snapshot structs and calls the
//! matching operation here. Each operation keeps these invariants:
//! - every cached guild has its public role
//! - member role lists only name roles of their guild
//! - every override's holder belongs to the channel's guild
//! - users are only kept while they share a cached guild with the client

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use jda_common::CacheConfig;
use jda_core::{
    Channel, DomainError, Guild, GuildChannel, GuildView, Member, OverrideHolder,
    PermissionOverride, Role, Snowflake, SnowflakeStore, User, VoiceState,
};

use crate::guild_cache::{new_store, GuildCache};
use crate::snapshot::{
    ChannelData, GuildSnapshot, GuildUpdate, MemberData, OverrideData, RoleData,
};

/// Result type for cache operations
pub type CacheResult<T> = Result<T, DomainError>;

/// Client-wide cache of guilds and users
#[derive(Debug)]
pub struct EntityCache {
    config: CacheConfig,
    self_user_id: Snowflake,
    users: SnowflakeStore<User>,
    guilds: SnowflakeStore<GuildCache>,
    /// Channel ID to owning guild ID
    channel_index: DashMap<Snowflake, Snowflake>,
}

impl EntityCache {
    /// Create an empty cache for the logged-in user
    pub fn new(self_user: User, config: CacheConfig) -> Self {
        let users = new_store(config.shard_amount, None);
        let self_user_id = self_user.id;
        users.put(self_user_id, self_user);

        Self {
            config,
            self_user_id,
            users,
            guilds: new_store(config.shard_amount, Some(GuildCache::by_name)),
            channel_index: DashMap::new(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    #[inline]
    pub fn self_user_id(&self) -> Snowflake {
        self.self_user_id
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn guild(&self, guild_id: Snowflake) -> Option<Arc<GuildCache>> {
        self.guilds.get(guild_id)
    }

    /// All cached guilds ordered by name
    pub fn guilds(&self) -> Vec<Arc<GuildCache>> {
        self.guilds.values()
    }

    pub fn user(&self, user_id: Snowflake) -> Option<Arc<User>> {
        self.users.get(user_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Find a channel of any cached guild
    pub fn channel(&self, channel_id: Snowflake) -> Option<Arc<GuildChannel>> {
        self.channel_guild(channel_id)?.channel(channel_id)
    }

    /// Guild owning a channel
    pub fn channel_guild(&self, channel_id: Snowflake) -> Option<Arc<GuildCache>> {
        let guild_id = *self.channel_index.get(&channel_id)?;
        self.guilds.get(guild_id)
    }

    pub fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<Arc<Member>> {
        self.guilds.get(guild_id)?.member(user_id)
    }

    /// The client's own member in a guild
    pub fn self_member(&self, guild_id: Snowflake) -> Option<Arc<Member>> {
        self.member(guild_id, self.self_user_id)
    }

    fn require_guild(&self, guild_id: Snowflake) -> CacheResult<Arc<GuildCache>> {
        self.guilds
            .get(guild_id)
            .ok_or(DomainError::GuildNotFound(guild_id))
    }

    // =========================================================================
    // Guild lifecycle
    // =========================================================================

    /// Cache a full guild, replacing any previous copy
    pub fn guild_create(&self, snapshot: GuildSnapshot) -> CacheResult<Arc<GuildCache>> {
        let guild_id = snapshot.id;
        if !snapshot.roles.iter().any(|role| role.id == guild_id) {
            return Err(DomainError::MissingPublicRole(guild_id));
        }

        let mut guild = Guild::new(guild_id, snapshot.name, snapshot.owner_id);
        let member_total = u32::try_from(snapshot.members.len()).unwrap_or(u32::MAX);
        guild.member_count = snapshot.member_count.unwrap_or(member_total);
        let cache = Arc::new(GuildCache::new(guild, self.config.shard_amount));

        for role in snapshot.roles {
            cache.roles().put(role.id, role.into_role(guild_id));
        }

        let voice_states: Vec<(Snowflake, VoiceState)> = snapshot
            .voice_states
            .into_iter()
            .map(|entry| (entry.user_id, entry.state))
            .collect();
        for data in snapshot.members {
            let voice = voice_states
                .iter()
                .find(|(user_id, _)| *user_id == data.user_id())
                .map(|(_, state)| *state);
            self.cache_member(&cache, data, voice);
        }

        for data in snapshot.channels.into_iter().chain(snapshot.threads) {
            let channel = self.build_channel(&cache, data)?;
            cache.channels().put(channel.id(), channel);
        }

        if let Some(previous) = self.guilds.put_arc(guild_id, Arc::clone(&cache)) {
            self.unindex_channels(&previous);
            let pruned = previous
                .members()
                .ids()
                .into_iter()
                .filter(|&user_id| self.prune_user(user_id))
                .count();
            warn!(guild_id = %guild_id, pruned_users = pruned, "Replaced already cached guild");
        }
        for channel_id in cache.channels().ids() {
            self.channel_index.insert(channel_id, guild_id);
        }

        info!(
            guild_id = %guild_id,
            roles = cache.roles().len(),
            channels = cache.channels().len(),
            members = cache.members().len(),
            "Guild cached"
        );
        Ok(cache)
    }

    /// Apply a guild metadata update
    pub fn guild_update(&self, update: GuildUpdate) -> CacheResult<Arc<Guild>> {
        let cache = self.require_guild(update.id)?;
        let guild = cache.update_guild(|old| Guild {
            name: update.name,
            owner_id: update.owner_id,
            ..old.clone()
        });
        debug!(guild_id = %guild.id, owner_id = %guild.owner_id, "Guild updated");
        Ok(guild)
    }

    /// Drop a guild and everything only it referenced
    pub fn guild_delete(&self, guild_id: Snowflake) -> Option<Arc<GuildCache>> {
        let cache = self.guilds.remove(guild_id)?;
        self.unindex_channels(&cache);

        let pruned = cache
            .members()
            .ids()
            .into_iter()
            .filter(|&user_id| self.prune_user(user_id))
            .count();

        info!(guild_id = %guild_id, pruned_users = pruned, "Guild removed from cache");
        Some(cache)
    }

    // =========================================================================
    // Channel lifecycle
    // =========================================================================

    pub fn channel_create(&self, guild_id: Snowflake, data: ChannelData) -> CacheResult<Arc<GuildChannel>> {
        let cache = self.require_guild(guild_id)?;
        let channel = Arc::new(self.build_channel(&cache, data)?);
        let channel_id = channel.id();

        cache.channels().put_arc(channel_id, Arc::clone(&channel));
        self.channel_index.insert(channel_id, guild_id);
        debug!(guild_id = %guild_id, channel_id = %channel_id, kind = ?channel.kind(), "Channel created");
        Ok(channel)
    }

    /// Replace a cached channel; the payload's overrides become authoritative
    pub fn channel_update(&self, guild_id: Snowflake, data: ChannelData) -> CacheResult<Arc<GuildChannel>> {
        let cache = self.require_guild(guild_id)?;
        let channel_id = data.id;
        if !cache.channels().contains(channel_id) {
            return Err(DomainError::ChannelNotFound(channel_id));
        }

        let channel = Arc::new(self.build_channel(&cache, data)?);
        cache.channels().put_arc(channel_id, Arc::clone(&channel));
        debug!(guild_id = %guild_id, channel_id = %channel_id, "Channel updated");
        Ok(channel)
    }

    /// Remove a channel and the threads started in it
    pub fn channel_delete(&self, channel_id: Snowflake) -> CacheResult<Arc<GuildChannel>> {
        let cache = self
            .channel_guild(channel_id)
            .ok_or(DomainError::ChannelNotFound(channel_id))?;
        let channel = cache
            .channels()
            .remove(channel_id)
            .ok_or(DomainError::ChannelNotFound(channel_id))?;
        self.channel_index.remove(&channel_id);

        let mut orphaned = Vec::new();
        cache.channels().retain(|id, child| {
            let keep = child.as_thread().map_or(true, |thread| thread.parent_id != channel_id);
            if !keep {
                orphaned.push(id);
            }
            keep
        });
        for thread_id in &orphaned {
            self.channel_index.remove(thread_id);
        }

        debug!(
            guild_id = %cache.id(),
            channel_id = %channel_id,
            threads = orphaned.len(),
            "Channel deleted"
        );
        Ok(channel)
    }

    // =========================================================================
    // Role lifecycle
    // =========================================================================

    pub fn role_create(&self, guild_id: Snowflake, data: RoleData) -> CacheResult<Arc<Role>> {
        let cache = self.require_guild(guild_id)?;
        let role = Arc::new(data.into_role(guild_id));
        cache.roles().put_arc(role.id, Arc::clone(&role));
        debug!(guild_id = %guild_id, role_id = %role.id, "Role created");
        Ok(role)
    }

    pub fn role_update(&self, guild_id: Snowflake, data: RoleData) -> CacheResult<Arc<Role>> {
        let cache = self.require_guild(guild_id)?;
        if !cache.roles().contains(data.id) {
            return Err(DomainError::RoleNotFound(data.id));
        }
        let role = Arc::new(data.into_role(guild_id));
        cache.roles().put_arc(role.id, Arc::clone(&role));
        debug!(guild_id = %guild_id, role_id = %role.id, position = role.position_raw, "Role updated");
        Ok(role)
    }

    /// Remove a role, its assignments and its channel overrides
    pub fn role_delete(&self, guild_id: Snowflake, role_id: Snowflake) -> CacheResult<Arc<Role>> {
        if role_id == guild_id {
            return Err(DomainError::CannotDeletePublicRole(guild_id));
        }
        let cache = self.require_guild(guild_id)?;
        let role = cache
            .roles()
            .remove(role_id)
            .ok_or(DomainError::RoleNotFound(role_id))?;

        let mut stripped = 0usize;
        for member in cache.members_with_role(role_id) {
            cache.members().update(member.user_id, |old| {
                let mut next = old.clone();
                next.remove_role(role_id);
                next
            });
            stripped += 1;
        }

        let mut overrides = 0usize;
        for channel in cache.channels().values() {
            if let Some(container) = channel.as_permission_container() {
                if container.overrides().remove(role_id).is_some() {
                    overrides += 1;
                }
            }
        }

        debug!(
            guild_id = %guild_id,
            role_id = %role_id,
            members = stripped,
            overrides,
            "Role deleted"
        );
        Ok(role)
    }

    // =========================================================================
    // Member lifecycle
    // =========================================================================

    /// A member joined; returns the member if the cache policy keeps it
    pub fn member_add(&self, guild_id: Snowflake, data: MemberData) -> CacheResult<Option<Arc<Member>>> {
        let cache = self.require_guild(guild_id)?;
        cache.update_guild(|old| Guild {
            member_count: old.member_count.saturating_add(1),
            ..old.clone()
        });
        Ok(self.cache_member(&cache, data, None))
    }

    /// Replace a member's roles and nickname
    ///
    /// Voice state and join time survive when the payload does not carry them.
    pub fn member_update(&self, guild_id: Snowflake, mut data: MemberData) -> CacheResult<Option<Arc<Member>>> {
        let cache = self.require_guild(guild_id)?;
        let previous = cache.member(data.user_id());
        let voice = previous.as_ref().and_then(|member| member.voice_state);
        if data.joined_at.is_none() {
            data.joined_at = previous.as_ref().and_then(|member| member.joined_at);
        }

        let member = self.cache_member(&cache, data, voice);
        debug!(guild_id = %guild_id, cached = member.is_some(), "Member updated");
        Ok(member)
    }

    /// A member left or was removed
    pub fn member_remove(&self, guild_id: Snowflake, user_id: Snowflake) -> CacheResult<Option<Arc<Member>>> {
        let cache = self.require_guild(guild_id)?;
        cache.update_guild(|old| Guild {
            member_count: old.member_count.saturating_sub(1),
            ..old.clone()
        });

        let member = cache.members().remove(user_id);
        if member.is_some() && self.prune_user(user_id) {
            debug!(user_id = %user_id, "User pruned, no mutual guilds left");
        }
        debug!(guild_id = %guild_id, user_id = %user_id, "Member removed");
        Ok(member)
    }

    /// Apply a voice state change to a cached member
    pub fn voice_state_update(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        state: VoiceState,
    ) -> CacheResult<Option<Arc<Member>>> {
        if !self.config.caches_voice_states() {
            return Ok(None);
        }
        let cache = self.require_guild(guild_id)?;
        let next_state = state.is_connected().then_some(state);
        let member = cache.members().update(user_id, |old| Member {
            voice_state: next_state,
            ..old.clone()
        });
        let Some(member) = member else {
            debug!(guild_id = %guild_id, user_id = %user_id, "Voice state for uncached member ignored");
            return Ok(None);
        };

        // Leaving voice can drop a member the policy only kept while connected
        let keep = user_id == self.self_user_id
            || next_state.is_some()
            || self
                .config
                .member_policy
                .should_cache(cache.is_owner(user_id), false);
        if !keep {
            cache.members().remove(user_id);
            self.prune_user(user_id);
            debug!(guild_id = %guild_id, user_id = %user_id, "Member left voice and was evicted");
        }
        Ok(Some(member))
    }

    // =========================================================================
    // Override lifecycle
    // =========================================================================

    /// Create or replace one override on a channel
    ///
    /// Returns `None` when the cache configuration skips the override.
    pub fn override_upsert(
        &self,
        channel_id: Snowflake,
        data: OverrideData,
    ) -> CacheResult<Option<Arc<PermissionOverride>>> {
        let cache = self
            .channel_guild(channel_id)
            .ok_or(DomainError::ChannelNotFound(channel_id))?;
        let channel = cache
            .channel(channel_id)
            .ok_or(DomainError::ChannelNotFound(channel_id))?;
        let container = channel
            .as_permission_container()
            .ok_or(DomainError::NotPermissionContainer(channel_id))?;

        if data.holder == OverrideHolder::Role && cache.role(data.id).is_none() {
            return Err(DomainError::ForeignHolder {
                holder_id: data.id,
                guild_id: cache.id(),
            });
        }
        if !self.keeps_override(&data) {
            debug!(channel_id = %channel_id, holder_id = %data.id, "Member override skipped");
            return Ok(None);
        }

        let ov = Arc::new(data.into_override(channel_id));
        container.overrides().put_arc(data.id, Arc::clone(&ov));
        debug!(
            channel_id = %channel_id,
            holder_id = %data.id,
            allow = %ov.allowed(),
            deny = %ov.denied(),
            "Permission override stored"
        );
        Ok(Some(ov))
    }

    pub fn override_delete(
        &self,
        channel_id: Snowflake,
        holder_id: Snowflake,
    ) -> CacheResult<Option<Arc<PermissionOverride>>> {
        let channel = self
            .channel(channel_id)
            .ok_or(DomainError::ChannelNotFound(channel_id))?;
        let container = channel
            .as_permission_container()
            .ok_or(DomainError::NotPermissionContainer(channel_id))?;

        let removed = container.overrides().remove(holder_id);
        debug!(channel_id = %channel_id, holder_id = %holder_id, removed = removed.is_some(), "Permission override deleted");
        Ok(removed)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn keeps_override(&self, data: &OverrideData) -> bool {
        data.holder == OverrideHolder::Role
            || data.id == self.self_user_id
            || self.config.caches_member_overrides()
    }

    /// Build a channel for `cache`, dropping overrides the guild cannot hold
    fn build_channel(&self, cache: &GuildCache, data: ChannelData) -> CacheResult<GuildChannel> {
        let guild_id = cache.id();
        if let Some(payload_guild) = data.guild_id {
            if payload_guild != guild_id {
                return Err(DomainError::InvalidSnapshot(format!(
                    "channel {} belongs to guild {payload_guild}, not {guild_id}",
                    data.id
                )));
            }
        }

        let channel_id = data.id;
        let mut channel = data.into_channel(guild_id, |ov| {
            if ov.holder == OverrideHolder::Role && cache.role(ov.id).is_none() {
                warn!(channel_id = %channel_id, holder_id = %ov.id, "Dropping override for unknown role");
                return false;
            }
            self.keeps_override(ov)
        })?;

        if let GuildChannel::Thread(thread) = &mut channel {
            thread.nsfw = match cache.channel(thread.parent_id).as_deref() {
                Some(GuildChannel::Forum(forum)) => forum.nsfw,
                Some(parent) => parent.as_message_channel().is_some_and(|c| c.is_nsfw()),
                None => false,
            };
        }
        Ok(channel)
    }

    /// Store a member if the cache policy allows it
    fn cache_member(
        &self,
        cache: &GuildCache,
        data: MemberData,
        voice: Option<VoiceState>,
    ) -> Option<Arc<Member>> {
        let guild_id = cache.id();
        let user_id = data.user_id();
        let voice = voice.filter(|_| self.config.caches_voice_states());

        let keep = user_id == self.self_user_id
            || self.config.member_policy.should_cache(
                cache.is_owner(user_id),
                voice.is_some_and(|state| state.is_connected()),
            );
        if !keep {
            cache.members().remove(user_id);
            return None;
        }

        let (user, mut member) = data.into_parts(guild_id);
        member.role_ids.retain(|&role_id| {
            let known = role_id != guild_id && cache.roles().contains(role_id);
            if !known {
                warn!(guild_id = %guild_id, user_id = %user_id, role_id = %role_id, "Dropping unknown member role");
            }
            known
        });
        member.voice_state = voice;

        self.users.put(user_id, user);
        let member = Arc::new(member);
        cache.members().put_arc(user_id, Arc::clone(&member));
        Some(member)
    }

    fn unindex_channels(&self, cache: &GuildCache) {
        for channel_id in cache.channels().ids() {
            self.channel_index
                .remove_if(&channel_id, |_, guild_id| *guild_id == cache.id());
        }
    }

    /// Drop a user that no cached guild references any more
    fn prune_user(&self, user_id: Snowflake) -> bool {
        if user_id == self.self_user_id {
            return false;
        }
        let shared = self
            .guilds
            .values()
            .iter()
            .any(|guild| guild.members().contains(user_id));
        !shared && self.users.remove(user_id).is_some()
    }
}
