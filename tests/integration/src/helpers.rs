//! Test helpers for integration tests
//!
//! Provides a cache harness that loads a guild snapshot and hands out the
//! services under test, plus assertions on service errors.

use std::sync::Arc;

use anyhow::{Context, Result};
use jda_cache::{EntityCache, GuildCache, GuildSnapshot};
use jda_common::CacheConfig;
use jda_core::{Member, Permissions, Snowflake};
use jda_service::{
    ModerationGuard, PermissionError, PermissionService, ServiceContext, ServiceError,
    ServiceResult,
};

use crate::fixtures::{self_user, GUILD_ID};

/// Cache with one guild loaded
pub struct TestCache {
    pub cache: Arc<EntityCache>,
    pub ctx: ServiceContext,
}

impl TestCache {
    /// Load a snapshot with the default cache configuration
    pub fn start(snapshot: GuildSnapshot) -> Result<Self> {
        Self::start_with_config(CacheConfig::default(), snapshot)
    }

    /// Load a snapshot with a custom cache configuration
    pub fn start_with_config(config: CacheConfig, snapshot: GuildSnapshot) -> Result<Self> {
        let cache = Arc::new(EntityCache::new(self_user(), config));
        cache.guild_create(snapshot)?;
        let ctx = ServiceContext::new(Arc::clone(&cache));
        Ok(Self { cache, ctx })
    }

    pub fn guild(&self) -> Result<Arc<GuildCache>> {
        self.cache
            .guild(GUILD_ID)
            .context("fixture guild is not cached")
    }

    pub fn member(&self, user_id: Snowflake) -> Result<Arc<Member>> {
        self.cache
            .member(GUILD_ID, user_id)
            .with_context(|| format!("member {user_id} is not cached"))
    }

    pub fn permissions(&self) -> PermissionService<'_> {
        PermissionService::new(&self.ctx)
    }

    pub fn moderation(&self) -> Result<ModerationGuard<'_>> {
        Ok(ModerationGuard::new(&self.ctx, GUILD_ID)?)
    }
}

/// Assert that a check failed for lack of exactly `expected`
pub fn assert_missing<T>(result: ServiceResult<T>, expected: Permissions) -> Result<()> {
    match result {
        Err(ServiceError::Permission(PermissionError::Insufficient { permission, .. }))
            if permission == expected =>
        {
            Ok(())
        }
        Err(err) => anyhow::bail!("Expected missing {expected:?}, got error: {err}"),
        Ok(_) => anyhow::bail!("Expected missing {expected:?}, but the check passed"),
    }
}

/// Assert that a check failed on the role hierarchy
pub fn assert_hierarchy<T>(result: ServiceResult<T>) -> Result<()> {
    match result {
        Err(ServiceError::Hierarchy(_)) => Ok(()),
        Err(err) => anyhow::bail!("Expected a hierarchy error, got: {err}"),
        Ok(_) => anyhow::bail!("Expected a hierarchy error, but the check passed"),
    }
}
