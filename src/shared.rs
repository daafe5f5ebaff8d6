//! A lock-protected [`PrefixIndex`] for use across threads.
//!
//! The index itself does no synchronization. This wrapper gives callers a
//! single-writer / many-readers discipline: lookups take a shared lock and run
//! concurrently, insertions take the exclusive lock. Lookups hand back owned
//! copies since borrowed results cannot outlive the guard; use
//! [`SharedPrefixIndex::read`] to borrow instead.

use parking_lot::{RwLock, RwLockReadGuard};

use crate::{Config, Outcome, PrefixError, PrefixIndex};

/// A [`PrefixIndex`] behind a reader/writer lock.
pub struct SharedPrefixIndex<V> {
    inner: RwLock<PrefixIndex<V>>,
}

impl<V> SharedPrefixIndex<V> {
    /// Create an empty shared index with the default [`Config`].
    pub fn new() -> Self {
        Self::from_index(PrefixIndex::new())
    }

    /// Create an empty shared index with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self::from_index(PrefixIndex::with_config(config))
    }

    /// Share an index that has already been built.
    pub fn from_index(index: PrefixIndex<V>) -> Self {
        Self {
            inner: RwLock::new(index),
        }
    }

    /// Take the index back out of the lock.
    pub fn into_inner(self) -> PrefixIndex<V> {
        self.inner.into_inner()
    }

    /// Hold the shared lock and borrow the index directly.
    pub fn read(&self) -> RwLockReadGuard<'_, PrefixIndex<V>> {
        self.inner.read()
    }

    /// Insert under the exclusive lock; returns the replaced value, if any.
    pub fn insert(&self, key: &str, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether no key is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// See [`PrefixIndex::resolve`].
    pub fn resolve(&self, prefix: &str) -> Outcome {
        self.inner.read().resolve(prefix)
    }

    /// See [`PrefixIndex::find_key`].
    pub fn find_key(&self, prefix: &str) -> Result<String, PrefixError> {
        self.inner.read().find_key(prefix).map(str::to_owned)
    }

    /// See [`PrefixIndex::find_all_keys`].
    pub fn find_all_keys(&self, prefix: &str) -> Vec<String> {
        let inner = self.inner.read();
        inner.matches(prefix).map(|(k, _)| k.to_owned()).collect()
    }
}

impl<V: Clone> SharedPrefixIndex<V> {
    /// Exact-key lookup.
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.read().get(key).cloned()
    }

    /// See [`PrefixIndex::find_unique`].
    pub fn find_unique(&self, prefix: &str) -> Result<V, PrefixError> {
        self.inner.read().find_unique(prefix).cloned()
    }

    /// See [`PrefixIndex::find_key_value`].
    pub fn find_key_value(&self, prefix: &str) -> Result<(String, V), PrefixError> {
        let inner = self.inner.read();
        inner
            .find_key_value(prefix)
            .map(|(k, v)| (k.to_owned(), v.clone()))
    }

    /// See [`PrefixIndex::find_all_values`].
    pub fn find_all_values(&self, prefix: &str) -> Vec<V> {
        let inner = self.inner.read();
        inner.matches(prefix).map(|(_, v)| v.clone()).collect()
    }

    /// See [`PrefixIndex::find_all_key_values`].
    pub fn find_all_key_values(&self, prefix: &str) -> Vec<(String, V)> {
        let inner = self.inner.read();
        inner
            .matches(prefix)
            .map(|(k, v)| (k.to_owned(), v.clone()))
            .collect()
    }
}

impl<V> Default for SharedPrefixIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<PrefixIndex<V>> for SharedPrefixIndex<V> {
    fn from(index: PrefixIndex<V>) -> Self {
        Self::from_index(index)
    }
}
