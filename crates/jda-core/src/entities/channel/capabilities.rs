//! Channel capabilities
//!
//! Each concrete channel implements only the capabilities it has. Code that
//! needs one asks for it by trait rather than by channel type.

use std::cmp::Ordering;
use std::sync::Arc;

use super::ChannelType;
use crate::entities::PermissionOverride;
use crate::store::SnowflakeStore;
use crate::value_objects::Snowflake;

/// Common identity of every guild channel
pub trait Channel: Send + Sync {
    fn id(&self) -> Snowflake;

    fn guild_id(&self) -> Snowflake;

    fn kind(&self) -> ChannelType;

    fn name(&self) -> &str;
}

/// Channel that carries its own permission overrides
pub trait PermissionContainer: Channel {
    /// Overrides keyed by holder ID
    fn overrides(&self) -> &SnowflakeStore<PermissionOverride>;

    /// Override for a role or member, if one exists
    fn permission_override(&self, holder_id: Snowflake) -> Option<Arc<PermissionOverride>> {
        self.overrides().get(holder_id)
    }

    /// All overrides in holder ID order
    fn permission_overrides(&self) -> Vec<Arc<PermissionOverride>> {
        self.overrides().values()
    }

    fn role_overrides(&self) -> Vec<Arc<PermissionOverride>> {
        self.permission_overrides()
            .into_iter()
            .filter(|ov| ov.is_role_override())
            .collect()
    }

    fn member_overrides(&self) -> Vec<Arc<PermissionOverride>> {
        self.permission_overrides()
            .into_iter()
            .filter(|ov| ov.is_member_override())
            .collect()
    }
}

/// Channel listed in the guild sidebar at a position
pub trait Positioned: Channel {
    fn position_raw(&self) -> i32;

    fn sort_bucket(&self) -> i8 {
        self.kind().sort_bucket()
    }
}

/// Channel that can sit under a category
pub trait Categorizable: Channel {
    fn parent_category_id(&self) -> Option<Snowflake>;
}

/// Channel that members can send messages to
pub trait MessageChannel: Channel {
    /// Per-user slowmode in seconds
    fn slowmode(&self) -> u32;

    fn is_nsfw(&self) -> bool;
}

/// Voice-like channel with audio limits
pub trait BitrateLimited: Channel {
    fn bitrate(&self) -> u32;

    /// 0 means unlimited
    fn user_limit(&self) -> u32;
}

/// Sidebar order: sort bucket, then raw position, then ID
pub fn cmp_position<A, B>(a: &A, b: &B) -> Ordering
where
    A: Positioned + ?Sized,
    B: Positioned + ?Sized,
{
    a.sort_bucket()
        .cmp(&b.sort_bucket())
        .then_with(|| a.position_raw().cmp(&b.position_raw()))
        .then_with(|| a.id().cmp(&b.id()))
}
