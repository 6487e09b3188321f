//! Voice state of a guild member

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Voice connection state, as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoiceState {
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
    #[serde(default)]
    pub self_mute: bool,
    #[serde(default)]
    pub self_deaf: bool,
    #[serde(default, rename = "mute")]
    pub guild_mute: bool,
    #[serde(default, rename = "deaf")]
    pub guild_deaf: bool,
    #[serde(default, rename = "suppress")]
    pub suppressed: bool,
}

impl VoiceState {
    /// Check if the member is connected to a voice channel
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.channel_id.is_some()
    }

    /// Muted by themselves or by the guild
    #[inline]
    pub fn is_muted(&self) -> bool {
        self.self_mute || self.guild_mute
    }

    /// Deafened by themselves or by the guild
    #[inline]
    pub fn is_deafened(&self) -> bool {
        self.self_deaf || self.guild_deaf
    }
}
