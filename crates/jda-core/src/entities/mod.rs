//! Domain entities - guild-scoped objects held by the cache

pub mod channel;
mod guild;
mod member;
mod permission_override;
mod role;
mod user;
mod voice_state;

pub use channel::{ChannelType, GuildChannel};
pub use guild::Guild;
pub use member::Member;
pub use permission_override::{OverrideHolder, PermissionOverride};
pub use role::Role;
pub use user::User;
pub use voice_state::VoiceState;
