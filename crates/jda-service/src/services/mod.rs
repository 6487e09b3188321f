//! Permission services
//!
//! Pure resolution and hierarchy functions, plus cache-backed services and
//! guards that check an action before it is sent.

pub mod context;
pub mod error;
pub mod hierarchy;
pub mod moderation;
pub mod overrides;
pub mod permission;
pub mod resolver;

pub use context::ServiceContext;
pub use error::{HierarchyError, PermissionError, ServiceError, ServiceResult};
pub use hierarchy::HierarchyGuard;
pub use moderation::ModerationGuard;
pub use overrides::PermissionOverrideAction;
pub use permission::PermissionService;
