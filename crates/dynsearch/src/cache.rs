//! Per-target-type composer cache.
//!
//! Looking up a composer is a compute-if-absent on a concurrent map keyed
//! by the target's [`TypeId`]: concurrent first requests for the same type
//! construct at most one composer and every caller receives the same
//! [`Arc`]. Entries are never evicted.

use std::any::{type_name, TypeId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::composer::Composer;

static GLOBAL: Lazy<Arc<BuilderCache>> = Lazy::new(|| Arc::new(BuilderCache::new()));

/// Concurrent map from target type to its [`Composer`].
#[derive(Debug, Default)]
pub struct BuilderCache {
    composers: DashMap<TypeId, Arc<Composer>>,
    created: AtomicUsize,
}

impl BuilderCache {
    pub fn new() -> Self {
        BuilderCache::default()
    }

    /// The process-wide cache.
    pub fn global() -> Arc<BuilderCache> {
        Arc::clone(&GLOBAL)
    }

    /// Returns the composer for `T`, creating it on first use.
    pub fn get_composer<T: ?Sized + 'static>(&self) -> Arc<Composer> {
        if let Some(existing) = self.composers.get(&TypeId::of::<T>()) {
            return Arc::clone(existing.value());
        }
        // The entry guard holds the shard lock, so only one thread creates.
        let entry = self.composers.entry(TypeId::of::<T>()).or_insert_with(|| {
            self.created.fetch_add(1, Ordering::Relaxed);
            debug!(target_type = type_name::<T>(), "created composer");
            Arc::new(Composer::for_type::<T>())
        });
        Arc::clone(entry.value())
    }

    /// Number of cached target types.
    pub fn len(&self) -> usize {
        self.composers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composers.is_empty()
    }

    /// Number of composers ever constructed by this cache.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}
