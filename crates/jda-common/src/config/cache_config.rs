//! Cache configuration - which optional data the entity cache keeps

use bitflags::bitflags;

use super::ConfigError;

bitflags! {
    /// Optional cache features
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CacheFlags: u32 {
        /// Keep channel overrides held by members other than the client itself
        const MEMBER_OVERRIDES = 1 << 0;
        /// Track member voice states
        const VOICE_STATE = 1 << 1;
    }
}

impl Default for CacheFlags {
    fn default() -> Self {
        Self::all()
    }
}

impl CacheFlags {
    /// Parse a comma separated list of flag names (case-insensitive)
    ///
    /// `none` or an empty string yields no flags.
    pub fn parse_list(value: &str) -> Result<Self, ConfigError> {
        let mut flags = Self::empty();
        for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if name.eq_ignore_ascii_case("none") {
                continue;
            }
            if name.eq_ignore_ascii_case("all") {
                flags |= Self::all();
                continue;
            }
            let flag = Self::from_name(&name.to_ascii_uppercase())
                .ok_or_else(|| ConfigError::InvalidValue("JDA_CACHE_FLAGS", name.to_string()))?;
            flags |= flag;
        }
        Ok(flags)
    }
}

/// Which members are kept in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberCachePolicy {
    /// Every member the client sees
    #[default]
    All,
    /// Only the client's own member
    None,
    /// Guild owners
    Owner,
    /// Members connected to a voice channel
    Voice,
}

impl MemberCachePolicy {
    /// Parse a policy name (case-insensitive)
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "none" => Ok(Self::None),
            "owner" => Ok(Self::Owner),
            "voice" => Ok(Self::Voice),
            _ => Err(ConfigError::InvalidValue(
                "JDA_MEMBER_CACHE_POLICY",
                value.to_string(),
            )),
        }
    }

    /// Decide whether a member is cached
    pub fn should_cache(self, is_owner: bool, in_voice: bool) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Owner => is_owner,
            Self::Voice => in_voice,
        }
    }
}

/// Entity cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheConfig {
    pub flags: CacheFlags,
    pub member_policy: MemberCachePolicy,
    /// Shard amount for each store; `None` uses the map's default
    pub shard_amount: Option<usize>,
}

impl CacheConfig {
    #[inline]
    pub fn caches_member_overrides(&self) -> bool {
        self.flags.contains(CacheFlags::MEMBER_OVERRIDES)
    }

    #[inline]
    pub fn caches_voice_states(&self) -> bool {
        self.flags.contains(CacheFlags::VOICE_STATE)
    }
}
