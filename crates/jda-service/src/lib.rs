//! # jda-service
//!
//! Application layer of the guild permission core: permission resolution,
//! role hierarchy checks and pre-flight guards over the entity cache.

pub mod services;

pub use services::{
    HierarchyError, HierarchyGuard, ModerationGuard, PermissionError, PermissionOverrideAction,
    PermissionService, ServiceContext, ServiceError, ServiceResult,
};
