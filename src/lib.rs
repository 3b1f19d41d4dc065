//! Cache Strategies - pattern-driven caching over a tiered cache manager
//!
//! Callers pick a caching policy by declaring how their data is accessed;
//! the policy decides TTL, tiers and invalidation, and never lets a cache
//! fault reach the caller.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod strategy;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheManager, TieredCacheManager};
pub use config::Config;
pub use strategy::{CacheKey, CacheOptions, CacheStrategy, CacheStrategyFactory};
pub use tasks::spawn_cleanup_task;
