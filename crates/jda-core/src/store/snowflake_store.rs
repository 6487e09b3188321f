//! Concurrent snowflake-keyed entity store
//!
//! Uses `DashMap` so readers never wait on a global lock and writers only
//! lock the shard that owns the key.

use dashmap::DashMap;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::value_objects::Snowflake;

/// Presentation order for [`SnowflakeStore::values`]
pub type SortOrder<T> = fn(&T, &T) -> Ordering;

/// Snowflake-keyed cache of shared entity snapshots
///
/// Entities are published as `Arc<T>` and replaced wholesale on update, so a
/// reader holding a value always sees one consistent version of it.
pub struct SnowflakeStore<T> {
    entries: DashMap<Snowflake, Arc<T>>,
    order: Option<SortOrder<T>>,
}

impl<T> SnowflakeStore<T> {
    /// Create an empty store iterated in snowflake order
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            order: None,
        }
    }

    /// Create an empty store iterated in the given presentation order
    #[must_use]
    pub fn with_order(order: SortOrder<T>) -> Self {
        Self {
            entries: DashMap::new(),
            order: Some(order),
        }
    }

    /// Create an empty store with an explicit shard amount
    ///
    /// The amount is rounded up to a power of two (minimum 2).
    #[must_use]
    pub fn with_shards(shard_amount: usize, order: Option<SortOrder<T>>) -> Self {
        let shard_amount = shard_amount.max(2).next_power_of_two();
        Self {
            entries: DashMap::with_shard_amount(shard_amount),
            order,
        }
    }

    /// Get an entity by ID
    pub fn get(&self, id: Snowflake) -> Option<Arc<T>> {
        self.entries.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Check whether an entity is cached
    pub fn contains(&self, id: Snowflake) -> bool {
        self.entries.contains_key(&id)
    }

    /// Insert or replace an entity, returning the previous snapshot
    pub fn put(&self, id: Snowflake, entity: T) -> Option<Arc<T>> {
        self.entries.insert(id, Arc::new(entity))
    }

    /// Insert or replace an already shared entity
    pub fn put_arc(&self, id: Snowflake, entity: Arc<T>) -> Option<Arc<T>> {
        self.entries.insert(id, entity)
    }

    /// Remove an entity, returning the last snapshot
    pub fn remove(&self, id: Snowflake) -> Option<Arc<T>> {
        self.entries.remove(&id).map(|(_, entity)| entity)
    }

    /// Replace an entity with a modified copy
    ///
    /// The key's shard stays locked while `f` runs, so concurrent updates of
    /// the same entity are applied one after the other.
    pub fn update<F>(&self, id: Snowflake, f: F) -> Option<Arc<T>>
    where
        F: FnOnce(&T) -> T,
    {
        let mut entry = self.entries.get_mut(&id)?;
        let next = Arc::new(f(entry.value()));
        *entry.value_mut() = Arc::clone(&next);
        Some(next)
    }

    /// Number of cached entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All cached IDs in ascending order
    pub fn ids(&self) -> Vec<Snowflake> {
        let mut ids: Vec<Snowflake> = self.entries.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// All cached entities in presentation order
    ///
    /// Entities the comparator considers equal stay in snowflake order.
    pub fn values(&self) -> Vec<Arc<T>> {
        let mut pairs: Vec<(Snowflake, Arc<T>)> = self
            .entries
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        pairs.sort_unstable_by_key(|(id, _)| *id);

        if let Some(order) = self.order {
            pairs.sort_by(|(_, a), (_, b)| order(a.as_ref(), b.as_ref()));
        }

        pairs.into_iter().map(|(_, entity)| entity).collect()
    }

    /// First entity (in snowflake order) matching a predicate
    pub fn find<P>(&self, mut predicate: P) -> Option<Arc<T>>
    where
        P: FnMut(&T) -> bool,
    {
        let mut matches: Vec<(Snowflake, Arc<T>)> = self
            .entries
            .iter()
            .filter(|entry| predicate(entry.value().as_ref()))
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        matches.sort_unstable_by_key(|(id, _)| *id);
        matches.into_iter().next().map(|(_, entity)| entity)
    }

    /// Keep only entities matching a predicate, returning how many were removed
    pub fn retain<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(Snowflake, &T) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|id, entity| predicate(*id, &**entity));
        before.saturating_sub(self.entries.len())
    }

    /// Drop every entity
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<T> Default for SnowflakeStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SnowflakeStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeStore")
            .field("len", &self.entries.len())
            .field("ordered", &self.order.is_some())
            .finish()
    }
}
