//! Read-only views the permission layer computes against

mod views;

pub use views::{GuildView, ViewResult};
