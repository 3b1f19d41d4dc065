//! Cache Manager Module
//!
//! The storage boundary consumed by the strategy layer, plus the tiered
//! in-memory implementation shipped with the crate.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::store::check_limits;
use crate::cache::{CacheEntry, CacheLevel, CacheStore, EntryScope, TierStats};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Operation Options ==
/// Read options passed to [`CacheManager::get`].
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Levels to read, in order. Empty means every level.
    pub levels: Vec<CacheLevel>,
    /// Back-fill earlier levels when the hit comes from a later one
    pub promote: bool,
}

/// Write options passed to [`CacheManager::set`].
#[derive(Debug, Clone)]
pub struct SetOptions {
    /// Lifetime of the written entry
    pub ttl: Duration,
    /// Levels to write. Empty means every level.
    pub levels: Vec<CacheLevel>,
    /// Only write the first requested level
    pub skip_lower_levels: bool,
    /// Invalidation tags
    pub tags: Vec<String>,
    /// Compression hint for the backing tier
    pub compression: bool,
    /// Encryption hint for the backing tier
    pub encryption: bool,
    /// Namespace and user the key was derived from
    pub scope: Option<EntryScope>,
}

impl SetOptions {
    pub fn new(ttl: Duration, levels: Vec<CacheLevel>) -> Self {
        Self {
            ttl,
            levels,
            skip_lower_levels: false,
            tags: Vec::new(),
            compression: false,
            encryption: false,
            scope: None,
        }
    }
}

// == Cache Manager Trait ==
/// Multi-tier key/value storage addressed by derived string keys.
///
/// Implementations must be safe for concurrent use; the strategy layer adds
/// no locking of its own.
#[async_trait]
pub trait CacheManager: Send + Sync {
    /// Returns the first live value found across the requested levels.
    async fn get(&self, key: &str, options: &GetOptions) -> Result<Option<Value>>;

    /// Writes `value` to the requested levels.
    async fn set(&self, key: &str, value: Value, options: &SetOptions) -> Result<()>;

    /// Removes `key` from the given levels. Absent keys are not an error.
    async fn delete(&self, key: &str, levels: &[CacheLevel]) -> Result<()>;

    /// Removes every key matching the glob `pattern`, returning the count.
    async fn delete_pattern(&self, pattern: &str, levels: &[CacheLevel]) -> Result<usize>;

    /// Removes every entry carrying `tag`, returning the count.
    async fn delete_tagged(&self, tag: &str, levels: &[CacheLevel]) -> Result<usize>;

    /// Removes every entry written with a scope of `namespace` and `user_id`,
    /// returning the count.
    async fn delete_scope(
        &self,
        namespace: &str,
        user_id: &str,
        levels: &[CacheLevel],
    ) -> Result<usize>;

    /// Per-level counters.
    async fn stats(&self) -> Vec<TierStats>;
}

// == Tiered Cache Manager ==
/// In-process manager with one bounded [`CacheStore`] per [`CacheLevel`].
#[derive(Debug)]
pub struct TieredCacheManager {
    memory: RwLock<CacheStore>,
    persistent: RwLock<CacheStore>,
}

impl TieredCacheManager {
    // == Constructor ==
    /// Creates a manager with the given per-tier capacities.
    pub fn new(max_memory_entries: usize, max_persistent_entries: usize) -> Self {
        Self {
            memory: RwLock::new(CacheStore::new(CacheLevel::Memory, max_memory_entries)),
            persistent: RwLock::new(CacheStore::new(
                CacheLevel::Persistent,
                max_persistent_entries,
            )),
        }
    }

    /// Creates a manager sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_memory_entries, config.max_persistent_entries)
    }

    fn tier(&self, level: CacheLevel) -> &RwLock<CacheStore> {
        match level {
            CacheLevel::Memory => &self.memory,
            CacheLevel::Persistent => &self.persistent,
        }
    }

    // == Cleanup Expired ==
    /// Purges expired entries from every tier, returning the total removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut removed = 0;
        for level in CacheLevel::ALL {
            removed += self.tier(level).write().await.cleanup_expired();
        }
        removed
    }

    /// Copies a hit found in a later level into the earlier ones.
    async fn promote(&self, key: &str, hit: &CacheEntry, into: &[CacheLevel]) {
        for &level in into {
            let entry = CacheEntry::new(hit.value.clone(), hit.ttl_remaining())
                .with_tags(hit.tags.clone())
                .with_hints(hit.compressed, hit.encrypted)
                .with_scope(hit.scope.clone());

            if let Err(e) = self.tier(level).write().await.set(key.to_string(), entry) {
                warn!(key = %key, level = %level, error = %e, "Promotion failed");
            }
        }
    }

    /// Restores the levels a failed write already touched to what they held
    /// before it.
    async fn roll_back(&self, key: &str, written: Vec<(CacheLevel, Option<CacheEntry>)>) {
        for (level, previous) in written {
            let mut store = self.tier(level).write().await;
            let restored = match previous {
                Some(entry) => store.set(key.to_string(), entry),
                None => store.delete(key),
            };
            if let Err(e) = restored {
                warn!(key = %key, level = %level, error = %e, "Rollback failed");
            }
        }
    }
}

/// Deduplicates requested levels while keeping their order; empty means all.
fn resolve_levels(levels: &[CacheLevel]) -> Vec<CacheLevel> {
    if levels.is_empty() {
        return CacheLevel::ALL.to_vec();
    }
    let mut resolved = Vec::with_capacity(levels.len());
    for level in levels {
        if !resolved.contains(level) {
            resolved.push(*level);
        }
    }
    resolved
}

#[async_trait]
impl CacheManager for TieredCacheManager {
    async fn get(&self, key: &str, options: &GetOptions) -> Result<Option<Value>> {
        let levels = resolve_levels(&options.levels);

        for (i, &level) in levels.iter().enumerate() {
            let found = self.tier(level).write().await.get(key);
            match found {
                Ok(entry) => {
                    if options.promote && i > 0 {
                        self.promote(key, &entry, &levels[..i]).await;
                    }
                    debug!(key = %key, level = %level, "Tier hit");
                    return Ok(Some(entry.value));
                }
                Err(CacheError::NotFound(_)) | Err(CacheError::Expired(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, options: &SetOptions) -> Result<()> {
        check_limits(key, &value)?;

        let mut levels = resolve_levels(&options.levels);
        if options.skip_lower_levels {
            levels.truncate(1);
        }

        let mut written: Vec<(CacheLevel, Option<CacheEntry>)> = Vec::with_capacity(levels.len());
        for level in levels {
            let entry = CacheEntry::new(value.clone(), Some(options.ttl))
                .with_tags(options.tags.clone())
                .with_hints(options.compression, options.encryption)
                .with_scope(options.scope.clone());

            let mut store = self.tier(level).write().await;
            let previous = store.peek(key);
            if let Err(e) = store.set(key.to_string(), entry) {
                drop(store);
                self.roll_back(key, written).await;
                return Err(e);
            }
            written.push((level, previous));
        }

        Ok(())
    }

    async fn delete(&self, key: &str, levels: &[CacheLevel]) -> Result<()> {
        for level in resolve_levels(levels) {
            match self.tier(level).write().await.delete(key) {
                Ok(()) | Err(CacheError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str, levels: &[CacheLevel]) -> Result<usize> {
        let mut removed = 0;
        for level in resolve_levels(levels) {
            removed += self.tier(level).write().await.remove_matching(pattern);
        }
        Ok(removed)
    }

    async fn delete_tagged(&self, tag: &str, levels: &[CacheLevel]) -> Result<usize> {
        let mut removed = 0;
        for level in resolve_levels(levels) {
            removed += self.tier(level).write().await.remove_tagged(tag);
        }
        Ok(removed)
    }

    async fn delete_scope(
        &self,
        namespace: &str,
        user_id: &str,
        levels: &[CacheLevel],
    ) -> Result<usize> {
        let mut removed = 0;
        for level in resolve_levels(levels) {
            removed += self
                .tier(level)
                .write()
                .await
                .remove_scoped(namespace, user_id);
        }
        Ok(removed)
    }

    async fn stats(&self) -> Vec<TierStats> {
        let mut stats = Vec::with_capacity(CacheLevel::ALL.len());
        for level in CacheLevel::ALL {
            stats.push(self.tier(level).read().await.stats());
        }
        stats
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BOTH: [CacheLevel; 2] = [CacheLevel::Memory, CacheLevel::Persistent];

    fn read(levels: &[CacheLevel], promote: bool) -> GetOptions {
        GetOptions {
            levels: levels.to_vec(),
            promote,
        }
    }

    #[tokio::test]
    async fn test_set_writes_every_requested_level() {
        let manager = TieredCacheManager::new(10, 10);
        let options = SetOptions::new(Duration::from_secs(60), BOTH.to_vec());

        manager.set("claims:c-1", json!("open"), &options).await.unwrap();

        for level in BOTH {
            let value = manager.get("claims:c-1", &read(&[level], false)).await.unwrap();
            assert_eq!(value, Some(json!("open")), "missing from {}", level);
        }
    }

    #[tokio::test]
    async fn test_skip_lower_levels_writes_first_only() {
        let manager = TieredCacheManager::new(10, 10);
        let mut options = SetOptions::new(Duration::from_secs(60), BOTH.to_vec());
        options.skip_lower_levels = true;

        manager.set("k", json!(1), &options).await.unwrap();

        let memory = manager.get("k", &read(&[CacheLevel::Memory], false)).await.unwrap();
        let persistent = manager
            .get("k", &read(&[CacheLevel::Persistent], false))
            .await
            .unwrap();
        assert_eq!(memory, Some(json!(1)));
        assert_eq!(persistent, None);
    }

    #[tokio::test]
    async fn test_promote_backfills_memory() {
        let manager = TieredCacheManager::new(10, 10);
        let options = SetOptions::new(Duration::from_secs(60), vec![CacheLevel::Persistent]);
        manager.set("ref:states", json!(["FL"]), &options).await.unwrap();

        // Without promotion the memory tier stays cold
        manager.get("ref:states", &read(&BOTH, false)).await.unwrap();
        let memory = manager
            .get("ref:states", &read(&[CacheLevel::Memory], false))
            .await
            .unwrap();
        assert_eq!(memory, None);

        manager.get("ref:states", &read(&BOTH, true)).await.unwrap();
        let memory = manager
            .get("ref:states", &read(&[CacheLevel::Memory], false))
            .await
            .unwrap();
        assert_eq!(memory, Some(json!(["FL"])));
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_ok() {
        let manager = TieredCacheManager::new(10, 10);
        assert!(manager.delete("missing", &BOTH).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_pattern_and_tagged() {
        let manager = TieredCacheManager::new(10, 10);
        let mut options = SetOptions::new(Duration::from_secs(60), BOTH.to_vec());
        manager.set("claims:c-1", json!(1), &options).await.unwrap();
        options.tags = vec!["dashboard".into()];
        manager.set("metrics:daily", json!(2), &options).await.unwrap();

        assert_eq!(manager.delete_pattern("claims:*", &BOTH).await.unwrap(), 2);
        assert_eq!(manager.delete_tagged("dashboard", &BOTH).await.unwrap(), 2);

        let stats = manager.stats().await;
        assert!(stats.iter().all(|s| s.total_entries == 0));
    }

    #[tokio::test]
    async fn test_cleanup_expired_across_tiers() {
        let manager = TieredCacheManager::new(10, 10);
        let options = SetOptions::new(Duration::from_millis(20), BOTH.to_vec());
        manager.set("k", json!(1), &options).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(manager.cleanup_expired().await, 2);
    }

    #[tokio::test]
    async fn test_failed_lower_tier_write_leaves_nothing_behind() {
        let manager = TieredCacheManager::new(10, 0);
        let options = SetOptions::new(Duration::from_secs(60), BOTH.to_vec());

        let result = manager.set("claims:c-1", json!(1), &options).await;

        assert!(matches!(result, Err(CacheError::CacheFull(_))));
        assert_eq!(manager.get("claims:c-1", &read(&BOTH, false)).await.unwrap(), None);
        assert!(manager.stats().await.iter().all(|s| s.total_entries == 0));
    }

    #[tokio::test]
    async fn test_failed_write_restores_previous_value() {
        let manager = TieredCacheManager::new(10, 0);
        let memory_only = SetOptions::new(Duration::from_secs(60), vec![CacheLevel::Memory]);
        manager.set("claims:c-1", json!("old"), &memory_only).await.unwrap();

        let both = SetOptions::new(Duration::from_secs(60), BOTH.to_vec());
        let result = manager.set("claims:c-1", json!("new"), &both).await;

        assert!(result.is_err());
        let memory = manager
            .get("claims:c-1", &read(&[CacheLevel::Memory], false))
            .await
            .unwrap();
        assert_eq!(memory, Some(json!("old")));
    }

    #[tokio::test]
    async fn test_limits_checked_before_any_tier_is_written() {
        let manager = TieredCacheManager::new(10, 10);
        let options = SetOptions::new(Duration::from_secs(60), BOTH.to_vec());
        let long_key = "k".repeat(crate::cache::MAX_KEY_LENGTH + 1);

        let result = manager.set(&long_key, json!(1), &options).await;

        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        assert!(manager.stats().await.iter().all(|s| s.total_entries == 0));
    }

    #[tokio::test]
    async fn test_delete_scope_and_promotion_keep_owner() {
        let manager = TieredCacheManager::new(10, 10);
        let mut options = SetOptions::new(Duration::from_secs(60), vec![CacheLevel::Persistent]);
        options.scope = Some(EntryScope::new("session", Some("u-7".to_string())));
        manager.set("session:cart:uu-7", json!(1), &options).await.unwrap();

        manager.get("session:cart:uu-7", &read(&BOTH, true)).await.unwrap();
        assert_eq!(manager.delete_scope("session", "u-7", &BOTH).await.unwrap(), 2);
        assert_eq!(manager.delete_scope("session", "u-7", &BOTH).await.unwrap(), 0);
    }

    #[test]
    fn test_resolve_levels() {
        assert_eq!(resolve_levels(&[]), CacheLevel::ALL.to_vec());
        assert_eq!(
            resolve_levels(&[CacheLevel::Persistent, CacheLevel::Memory, CacheLevel::Persistent]),
            vec![CacheLevel::Persistent, CacheLevel::Memory]
        );
    }
}
