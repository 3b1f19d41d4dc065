//! Per-call overrides for strategy operations.

use std::time::Duration;

use crate::cache::CacheLevel;

/// Options for `get`/`set`. Anything set here wins over the strategy's
/// configured defaults.
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    pub ttl: Option<Duration>,
    pub levels: Option<Vec<CacheLevel>>,
    /// Bypass the cache entirely
    pub skip_cache: bool,
    /// Ignore the cached value; the caller recomputes and writes back
    pub force_refresh: bool,
    /// Pull a hit from a slower tier into the faster configured tiers
    pub warmup: bool,
    /// Invalidation tags attached on write
    pub tags: Vec<String>,
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn levels(mut self, levels: Vec<CacheLevel>) -> Self {
        self.levels = Some(levels);
        self
    }

    pub fn skip_cache(mut self) -> Self {
        self.skip_cache = true;
        self
    }

    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    pub fn warmup(mut self) -> Self {
        self.warmup = true;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Options for `invalidate`.
#[derive(Debug, Clone, Default)]
pub struct InvalidateOptions {
    /// Wildcard invalidation instead of a single-key delete
    pub pattern: bool,
    pub levels: Option<Vec<CacheLevel>>,
}

impl InvalidateOptions {
    /// Single-key invalidation across the strategy's levels.
    pub fn key() -> Self {
        Self::default()
    }

    /// Wildcard invalidation across the strategy's levels.
    pub fn pattern() -> Self {
        Self {
            pattern: true,
            levels: None,
        }
    }
}
