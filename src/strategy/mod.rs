//! Strategy Module
//!
//! Pattern-driven caching policies over a shared [`CacheManager`](crate::cache::CacheManager).
//!
//! A caller declares how its data is accessed, obtains the matching
//! [`CacheStrategy`] from a [`CacheStrategyFactory`], and uses its
//! get/set/invalidate/warmup operations. None of those operations ever
//! surface a cache fault.

mod cache_strategy;
mod config;
mod factory;
mod key;
mod options;

#[cfg(test)]
mod property_tests;

pub use cache_strategy::{CacheStrategy, StrategyKind};
pub use config::{
    AccessPattern, CachePattern, CacheStrategyConfig, DataSize, InvalidationStrategy,
    WarmupStrategy, WritePolicy,
};
pub use factory::CacheStrategyFactory;
pub use key::{metadata_hash, CacheKey, KeyPart};
pub use options::{CacheOptions, InvalidateOptions};
