//! In-memory cache of loaded data files.
//!
//! Loaded values are shared immutable: the cache hands out `Arc` handles
//! and entries only leave through [`TableCache::evict`], which the update
//! pipeline calls after rewriting a file. The map is guarded by a mutex so
//! that two threads
//! racing on the first access of a key cannot both load the file; the
//! loser of the race observes the winner's entry.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chemref_model::Result;
use polars::prelude::DataFrame;

/// Cache key: dataset category plus name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheKey {
    pub category: String,
    pub name: String,
}

impl CacheKey {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }
}

/// Process-wide cache for loaded tables and JSON documents.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: Mutex<BTreeMap<CacheKey, Arc<DataFrame>>>,
    json: Mutex<BTreeMap<CacheKey, Arc<serde_json::Value>>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached table, or load it with `load` and retain the result.
    ///
    /// The lock is held across the load so concurrent first accesses of the
    /// same key resolve to a single load.
    pub fn table_or_insert_with<F>(&self, key: CacheKey, load: F) -> Result<Arc<DataFrame>>
    where
        F: FnOnce() -> Result<DataFrame>,
    {
        let mut guard = self.tables.lock().expect("table cache lock poisoned");
        if let Some(cached) = guard.get(&key) {
            return Ok(Arc::clone(cached));
        }
        let value = Arc::new(load()?);
        guard.insert(key, Arc::clone(&value));
        Ok(value)
    }

    /// Get a cached JSON document, or load it with `load` and retain it.
    pub fn json_or_insert_with<F>(&self, key: CacheKey, load: F) -> Result<Arc<serde_json::Value>>
    where
        F: FnOnce() -> Result<serde_json::Value>,
    {
        let mut guard = self.json.lock().expect("json cache lock poisoned");
        if let Some(cached) = guard.get(&key) {
            return Ok(Arc::clone(cached));
        }
        let value = Arc::new(load()?);
        guard.insert(key, Arc::clone(&value));
        Ok(value)
    }

    /// Drop any cached value for a dataset. Existing `Arc` handles stay
    /// valid; the next load re-reads the file.
    pub fn evict(&self, key: &CacheKey) {
        self.tables
            .lock()
            .expect("table cache lock poisoned")
            .remove(key);
        self.json
            .lock()
            .expect("json cache lock poisoned")
            .remove(key);
    }

    pub fn contains_table(&self, key: &CacheKey) -> bool {
        self.tables
            .lock()
            .expect("table cache lock poisoned")
            .contains_key(key)
    }

    pub fn table_count(&self) -> usize {
        self.tables.lock().expect("table cache lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, NamedFrom, Series};

    fn sample_df() -> DataFrame {
        let col: Column = Series::new("z".into(), &[1i64, 2]).into();
        DataFrame::new(vec![col]).unwrap()
    }

    #[test]
    fn test_second_access_returns_same_object() {
        let cache = TableCache::new();
        let key = CacheKey::new("atom", "periodic_table");

        let first = cache
            .table_or_insert_with(key.clone(), || Ok(sample_df()))
            .unwrap();
        let second = cache
            .table_or_insert_with(key.clone(), || panic!("must not reload"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.table_count(), 1);
    }

    #[test]
    fn test_failed_load_leaves_no_entry() {
        let cache = TableCache::new();
        let key = CacheKey::new("atom", "broken");

        let result = cache.table_or_insert_with(key.clone(), || {
            Err(chemref_model::DataError::input("name", "broken", "boom"))
        });
        assert!(result.is_err());
        assert!(!cache.contains_table(&key));
    }

    #[test]
    fn test_evicted_entry_is_reloaded() {
        let cache = TableCache::new();
        let key = CacheKey::new("atom", "periodic_table");
        cache
            .table_or_insert_with(key.clone(), || Ok(sample_df()))
            .unwrap();
        cache.evict(&key);
        assert!(!cache.contains_table(&key));

        let mut reloaded = false;
        cache
            .table_or_insert_with(key.clone(), || {
                reloaded = true;
                Ok(sample_df())
            })
            .unwrap();
        assert!(reloaded);
    }

    #[test]
    fn test_keys_are_scoped_by_category() {
        let cache = TableCache::new();
        cache
            .table_or_insert_with(CacheKey::new("atom", "x"), || Ok(sample_df()))
            .unwrap();
        cache
            .table_or_insert_with(CacheKey::new("pdb", "x"), || Ok(sample_df()))
            .unwrap();
        assert_eq!(cache.table_count(), 2);
    }
}
