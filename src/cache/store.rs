//! Cache Store Module
//!
//! Storage for a single tier: HashMap entries with LRU tracking and TTL expiration.

use std::collections::HashMap;

use serde_json::Value;

use crate::cache::pattern::glob_matches;
use crate::cache::{CacheEntry, CacheLevel, LruTracker, TierStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded storage for one tier with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore {
    /// Tier this store backs
    level: CacheLevel,
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: TierStats,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store for `level` holding at most `max_entries`.
    pub fn new(level: CacheLevel, max_entries: usize) -> Self {
        Self {
            level,
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: TierStats::new(level),
            max_entries,
        }
    }

    // == Set ==
    /// Stores an entry under `key`, replacing any previous entry.
    ///
    /// If the store is at capacity and `key` is new, the least recently used
    /// entry is evicted first.
    pub fn set(&mut self, key: String, entry: CacheEntry) -> Result<()> {
        check_limits(&key, &entry.value)?;

        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted_key) => {
                    self.entries.remove(&evicted_key);
                    self.stats.record_eviction();
                }
                None => {
                    return Err(CacheError::CacheFull(format!(
                        "{} tier is full and eviction failed",
                        self.level
                    )));
                }
            }
        }

        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Returns a copy of the live entry under `key`.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Result<CacheEntry> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        if entry.is_expired() {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            return Err(CacheError::Expired(key.to_string()));
        }

        let entry = entry.clone();
        self.stats.record_hit();
        self.lru.touch(key);
        Ok(entry)
    }

    /// Returns the stored entry under `key` without touching LRU order or
    /// counters. Expired entries are returned as-is.
    pub fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).cloned()
    }

    // == Delete ==
    /// Removes the entry under `key`.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
            Ok(())
        } else {
            Err(CacheError::NotFound(key.to_string()))
        }
    }

    /// Removes every entry whose key matches the glob `pattern`.
    pub fn remove_matching(&mut self, pattern: &str) -> usize {
        self.remove_where(|key, _| glob_matches(pattern, key))
    }

    /// Removes every entry tagged with `tag`.
    pub fn remove_tagged(&mut self, tag: &str) -> usize {
        self.remove_where(|_, entry| entry.has_tag(tag))
    }

    /// Removes every entry in `namespace` owned by `user_id`.
    pub fn remove_scoped(&mut self, namespace: &str, user_id: &str) -> usize {
        self.remove_where(|_, entry| {
            entry
                .scope
                .as_ref()
                .is_some_and(|scope| scope.is_owned_by(namespace, user_id))
        })
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let count = self.remove_where(|_, entry| entry.is_expired());
        self.stats.record_expirations(count);
        count
    }

    fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&str, &CacheEntry) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| predicate(key, entry))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.set_total_entries(self.entries.len());
        doomed.len()
    }

    // == Stats ==
    /// Returns a snapshot of this tier's counters.
    pub fn stats(&self) -> TierStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}

// == Limits ==
/// Rejects keys longer than [`MAX_KEY_LENGTH`] and values whose JSON form
/// exceeds [`MAX_VALUE_SIZE`].
pub fn check_limits(key: &str, value: &Value) -> Result<()> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }

    let size = serde_json::to_string(value)?.len();
    if size > MAX_VALUE_SIZE {
        return Err(CacheError::InvalidRequest(format!(
            "Value exceeds maximum size of {} bytes",
            MAX_VALUE_SIZE
        )));
    }

    Ok(())
}
