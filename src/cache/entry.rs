//! Cache Entry Module
//!
//! Defines the structure for individual tier entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// Represents a single entry held by one cache tier.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
    /// Tags attached at write time, used for tag invalidation
    pub tags: Vec<String>,
    /// Compression hint forwarded by the writer
    pub compressed: bool,
    /// Encryption hint forwarded by the writer
    pub encrypted: bool,
    /// Structured owner of the key, used for scoped invalidation
    pub scope: Option<EntryScope>,
}

/// Namespace and user a stored key was derived from.
///
/// Scoped deletes compare these fields instead of parsing the joined key,
/// so an identifier that happens to contain `:u<id>` cannot match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryScope {
    pub namespace: String,
    pub user_id: Option<String>,
}

impl EntryScope {
    pub fn new(namespace: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            namespace: namespace.into(),
            user_id,
        }
    }

    /// True if this scope belongs to `user_id` within `namespace`.
    pub fn is_owned_by(&self, namespace: &str, user_id: &str) -> bool {
        self.namespace == namespace && self.user_id.as_deref() == Some(user_id)
    }
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Optional time to live; `None` never expires
    pub fn new(value: Value, ttl: Option<Duration>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = ttl.map(|ttl| now.saturating_add(duration_to_millis(ttl)));

        Self {
            value,
            expires_at,
            tags: Vec::new(),
            compressed: false,
            encrypted: false,
            scope: None,
        }
    }

    /// Attaches invalidation tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Records the compression and encryption hints. The value is not transformed.
    pub fn with_hints(mut self, compressed: bool, encrypted: bool) -> Self {
        self.compressed = compressed;
        self.encrypted = encrypted;
        self
    }

    /// Records which namespace and user the key belongs to.
    pub fn with_scope(mut self, scope: Option<EntryScope>) -> Self {
        self.scope = scope;
        self
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    /// Returns true if the entry carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if no expiration is set.
    ///
    /// Expired entries report a zero duration.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at.map(|expires| {
            Duration::from_millis(expires.saturating_sub(current_timestamp_ms()))
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(duration_to_millis)
        .unwrap_or(0)
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
