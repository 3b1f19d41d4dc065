//! Cache Strategy Module
//!
//! One generic implementation of get/set/invalidate/warmup, parameterized by
//! a closed set of policy kinds. Kind-specific behaviour lives in three hooks:
//! the SessionBased user guard, RealTime tier confinement on write, and the
//! sequential eager warmup used by ReferenceData.
//!
//! Every public operation is infallible from the caller's point of view:
//! cache faults are logged and turned into a miss or a dropped write.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::cache::{CacheLevel, CacheManager, EntryScope, GetOptions, SetOptions};
use crate::strategy::{
    AccessPattern, CacheKey, CacheOptions, CachePattern, CacheStrategyConfig, InvalidateOptions,
    InvalidationStrategy, WarmupStrategy, WritePolicy,
};

const MINUTE: Duration = Duration::from_secs(60);

// == Strategy Kind ==
/// The five policy variants a [`CacheStrategy`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    FrequentlyAccessed,
    SessionBased,
    RealTime,
    ReferenceData,
    Computational,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::FrequentlyAccessed => "FrequentlyAccessed",
            StrategyKind::SessionBased => "SessionBased",
            StrategyKind::RealTime => "RealTime",
            StrategyKind::ReferenceData => "ReferenceData",
            StrategyKind::Computational => "Computational",
        }
    }

    /// Fixed policy for this kind.
    pub fn config(&self) -> CacheStrategyConfig {
        use CacheLevel::{Memory, Persistent};

        match self {
            StrategyKind::FrequentlyAccessed => CacheStrategyConfig {
                pattern: CachePattern::FrequentlyAccessed,
                access_pattern: AccessPattern::ReadHeavy,
                levels: vec![Memory, Persistent],
                strategy: WritePolicy::WriteThrough,
                ttl: 15 * MINUTE,
                compression: false,
                encryption: false,
                invalidation_strategy: InvalidationStrategy::TimeBased,
                warmup_strategy: Some(WarmupStrategy::Lazy),
            },
            StrategyKind::SessionBased => CacheStrategyConfig {
                pattern: CachePattern::SessionBased,
                access_pattern: AccessPattern::Balanced,
                levels: vec![Memory, Persistent],
                strategy: WritePolicy::CacheAside,
                ttl: 30 * MINUTE,
                compression: false,
                encryption: true,
                invalidation_strategy: InvalidationStrategy::EventBased,
                warmup_strategy: None,
            },
            StrategyKind::RealTime => CacheStrategyConfig {
                pattern: CachePattern::RealTime,
                access_pattern: AccessPattern::WriteHeavy,
                levels: vec![Memory],
                strategy: WritePolicy::WriteAround,
                ttl: Duration::from_secs(30),
                compression: false,
                encryption: false,
                invalidation_strategy: InvalidationStrategy::TimeBased,
                warmup_strategy: None,
            },
            StrategyKind::ReferenceData => CacheStrategyConfig {
                pattern: CachePattern::ReferenceData,
                access_pattern: AccessPattern::ReadHeavy,
                levels: vec![Memory, Persistent],
                strategy: WritePolicy::CacheAside,
                ttl: 24 * 60 * MINUTE,
                compression: true,
                encryption: false,
                invalidation_strategy: InvalidationStrategy::Manual,
                warmup_strategy: Some(WarmupStrategy::Eager),
            },
            StrategyKind::Computational => CacheStrategyConfig {
                pattern: CachePattern::Computational,
                access_pattern: AccessPattern::ReadHeavy,
                levels: vec![Memory, Persistent],
                strategy: WritePolicy::CacheAside,
                ttl: 60 * MINUTE,
                compression: true,
                encryption: false,
                invalidation_strategy: InvalidationStrategy::TimeBased,
                warmup_strategy: Some(WarmupStrategy::Lazy),
            },
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// == Cache Strategy ==
/// A caching policy bound to a shared cache manager.
///
/// Holds no mutable state; one instance can serve any number of concurrent
/// callers. Concurrent misses on the same key are not coalesced.
pub struct CacheStrategy {
    kind: StrategyKind,
    config: CacheStrategyConfig,
    manager: Arc<dyn CacheManager>,
}

impl fmt::Debug for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStrategy")
            .field("kind", &self.kind)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CacheStrategy {
    // == Constructor ==
    pub fn new(kind: StrategyKind, manager: Arc<dyn CacheManager>) -> Self {
        Self {
            kind,
            config: kind.config(),
            manager,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn config(&self) -> &CacheStrategyConfig {
        &self.config
    }

    // == Override Resolution ==
    /// True when the caller asked to bypass cached values.
    pub fn should_skip_cache(&self, options: &CacheOptions) -> bool {
        options.skip_cache || options.force_refresh
    }

    pub fn ttl(&self, options: &CacheOptions) -> Duration {
        options.ttl.unwrap_or(self.config.ttl)
    }

    pub fn levels(&self, options: &CacheOptions) -> Vec<CacheLevel> {
        options
            .levels
            .clone()
            .unwrap_or_else(|| self.config.levels.clone())
    }

    // == Get ==
    /// Reads a cached value, or `None` on miss, skip, misuse or any fault.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey, options: &CacheOptions) -> Option<T> {
        if self.should_skip_cache(options) || !self.admits(key, "get") {
            return None;
        }

        let storage_key = key.storage_key();
        let read = self.read_options(options);

        match self.manager.get(&storage_key, &read).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!(strategy = %self.kind, key = %storage_key, error = %e, "Cached value has unexpected shape");
                    None
                }
            },
            Ok(None) => {
                debug!(strategy = %self.kind, key = %storage_key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(strategy = %self.kind, key = %storage_key, error = %e, "Cache get failed");
                None
            }
        }
    }

    // == Set ==
    /// Writes a value. Failures are logged and dropped.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T, options: &CacheOptions) {
        if !self.admits(key, "set") {
            return;
        }

        let storage_key = key.storage_key();
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                error!(strategy = %self.kind, key = %storage_key, error = %e, "Value is not serializable");
                return;
            }
        };

        let write = self.write_options(key, options);
        if let Err(e) = self.manager.set(&storage_key, value, &write).await {
            error!(strategy = %self.kind, key = %storage_key, error = %e, "Cache set failed");
        }
    }

    // == Invalidate ==
    /// Drops one key, or with `options.pattern` its whole namespace.
    /// SessionBased narrows the namespace to entries owned by the key's user.
    pub async fn invalidate(&self, key: &CacheKey, options: &InvalidateOptions) {
        let levels = options
            .levels
            .clone()
            .unwrap_or_else(|| self.config.levels.clone());

        if !options.pattern {
            let storage_key = key.storage_key();
            if let Err(e) = self.manager.delete(&storage_key, &levels).await {
                error!(strategy = %self.kind, key = %storage_key, error = %e, "Cache invalidate failed");
            }
            return;
        }

        if self.kind != StrategyKind::SessionBased {
            let pattern = format!("{}:*", key.namespace);
            match self.manager.delete_pattern(&pattern, &levels).await {
                Ok(removed) => {
                    debug!(strategy = %self.kind, pattern = %pattern, removed, "Pattern invalidated");
                }
                Err(e) => {
                    error!(strategy = %self.kind, pattern = %pattern, error = %e, "Pattern invalidate failed");
                }
            }
            return;
        }

        let Some(user_id) = &key.user_id else {
            warn!(strategy = %self.kind, namespace = %key.namespace, "Session pattern invalidation requires a user id");
            return;
        };
        match self.manager.delete_scope(&key.namespace, user_id, &levels).await {
            Ok(removed) => {
                debug!(strategy = %self.kind, namespace = %key.namespace, user_id = %user_id, removed, "User scope invalidated");
            }
            Err(e) => {
                error!(strategy = %self.kind, namespace = %key.namespace, user_id = %user_id, error = %e, "User scope invalidate failed");
            }
        }
    }

    /// Drops every entry written with `tag` from this strategy's levels.
    pub async fn invalidate_tag(&self, tag: &str) {
        match self.manager.delete_tagged(tag, &self.config.levels).await {
            Ok(removed) => debug!(strategy = %self.kind, tag, removed, "Tag invalidated"),
            Err(e) => error!(strategy = %self.kind, tag, error = %e, "Tag invalidate failed"),
        }
    }

    // == Warmup ==
    /// Pulls `keys` into the fastest configured tier.
    ///
    /// Only eager strategies do work here; lazy ones populate on first read.
    /// Returns how many keys were found.
    pub async fn warmup(&self, keys: &[CacheKey]) -> usize {
        if self.config.warmup_strategy != Some(WarmupStrategy::Eager) {
            debug!(strategy = %self.kind, keys = keys.len(), "Warmup skipped");
            return 0;
        }

        let read = GetOptions {
            levels: self.config.levels.clone(),
            promote: true,
        };

        let mut warmed = 0;
        for key in keys {
            if !self.admits(key, "warmup") {
                continue;
            }
            let storage_key = key.storage_key();
            match self.manager.get(&storage_key, &read).await {
                Ok(Some(_)) => warmed += 1,
                Ok(None) => debug!(strategy = %self.kind, key = %storage_key, "Nothing to warm"),
                Err(e) => {
                    warn!(strategy = %self.kind, key = %storage_key, error = %e, "Warmup read failed");
                }
            }
        }

        debug!(strategy = %self.kind, warmed, requested = keys.len(), "Warmup finished");
        warmed
    }

    // == Get Or Load ==
    /// Cache-aside read: returns the cached value, or runs `loader` and
    /// caches its result.
    ///
    /// A loader error is returned unchanged and nothing is cached. With
    /// `skip_cache` the loaded value is not written back.
    pub async fn get_or_load<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        options: &CacheOptions,
        loader: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get(key, options).await {
            return Ok(cached);
        }

        let loaded = loader().await?;
        if !options.skip_cache {
            self.set(key, &loaded, options).await;
        }
        Ok(loaded)
    }

    // == Kind Hooks ==
    /// SessionBased only operates on user-scoped keys.
    fn admits(&self, key: &CacheKey, operation: &str) -> bool {
        if self.kind == StrategyKind::SessionBased && key.user_id.is_none() {
            warn!(strategy = %self.kind, key = %key, operation, "Session cache requires a user id");
            return false;
        }
        true
    }

    /// RealTime reads stay in memory and never back-fill another tier.
    fn read_options(&self, options: &CacheOptions) -> GetOptions {
        if self.kind == StrategyKind::RealTime {
            return GetOptions {
                levels: vec![CacheLevel::Memory],
                promote: false,
            };
        }
        GetOptions {
            levels: self.levels(options),
            promote: options.warmup,
        }
    }

    /// RealTime writes never reach tiers below memory.
    fn write_options(&self, key: &CacheKey, options: &CacheOptions) -> SetOptions {
        let mut write = SetOptions::new(self.ttl(options), self.levels(options));
        write.tags = options.tags.clone();
        write.compression = self.config.compression;
        write.encryption = self.config.encryption;
        write.scope = Some(EntryScope::new(key.namespace.clone(), key.user_id.clone()));

        if self.kind == StrategyKind::RealTime {
            write.levels = vec![CacheLevel::Memory];
            write.skip_lower_levels = true;
        }
        write
    }
}
