//! Cache Module
//!
//! Tiered in-memory storage with TTL expiration and LRU eviction, exposed to
//! the strategy layer through the [`CacheManager`] trait.

mod entry;
mod level;
mod lru;
mod manager;
mod pattern;
mod stats;
mod store;


// Re-export public types
pub use entry::{duration_to_millis, CacheEntry, EntryScope};
pub use level::CacheLevel;
pub use lru::LruTracker;
pub use manager::{CacheManager, GetOptions, SetOptions, TieredCacheManager};
pub use pattern::glob_matches;
pub use stats::TierStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 512;

/// Maximum allowed serialized value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
