//! Channel type numbers as sent by the platform

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Guild channel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ChannelType {
    Text = 0,
    Voice = 2,
    Category = 4,
    Announcement = 5,
    AnnouncementThread = 10,
    PublicThread = 11,
    PrivateThread = 12,
    Stage = 13,
    Forum = 15,
    Media = 16,
}

impl ChannelType {
    /// Display bucket: text-like channels first, then voice-like, then categories
    ///
    /// Threads are not listed in the channel sidebar and report -1.
    pub const fn sort_bucket(self) -> i8 {
        match self {
            Self::Text | Self::Announcement | Self::Forum | Self::Media => 0,
            Self::Voice | Self::Stage => 1,
            Self::Category => 2,
            Self::AnnouncementThread | Self::PublicThread | Self::PrivateThread => -1,
        }
    }

    #[inline]
    pub const fn is_thread(self) -> bool {
        matches!(
            self,
            Self::AnnouncementThread | Self::PublicThread | Self::PrivateThread
        )
    }

    /// Voice and stage channels, which require CONNECT to be accessed
    #[inline]
    pub const fn is_voice_like(self) -> bool {
        matches!(self, Self::Voice | Self::Stage)
    }
}

impl TryFrom<u8> for ChannelType {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Text,
            2 => Self::Voice,
            4 => Self::Category,
            5 => Self::Announcement,
            10 => Self::AnnouncementThread,
            11 => Self::PublicThread,
            12 => Self::PrivateThread,
            13 => Self::Stage,
            15 => Self::Forum,
            16 => Self::Media,
            other => {
                return Err(DomainError::InvalidSnapshot(format!(
                    "unsupported guild channel type {other}"
                )))
            }
        })
    }
}

impl From<ChannelType> for u8 {
    fn from(kind: ChannelType) -> Self {
        kind as u8
    }
}
