//! Request DTOs for the cache strategy API
//!
//! Defines the structure of incoming HTTP request bodies and queries.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::cache::CacheLevel;
use crate::strategy::{CacheKey, CacheOptions, InvalidateOptions, KeyPart};

/// Returns an error message if `key` lacks a namespace or identifier.
fn validate_key(key: &CacheKey) -> Option<String> {
    if key.namespace.is_empty() {
        return Some("Key namespace cannot be empty".to_string());
    }
    if key.identifier == KeyPart::Text(String::new()) {
        return Some("Key identifier cannot be empty".to_string());
    }
    None
}

/// Request body for `PUT /cache/:pattern`
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: CacheKey,
    pub value: Value,
    /// Overrides the strategy TTL, in milliseconds
    #[serde(default)]
    pub ttl_ms: Option<u64>,
    #[serde(default)]
    pub levels: Option<Vec<CacheLevel>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SetRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }

    pub fn options(&self) -> CacheOptions {
        CacheOptions {
            ttl: self.ttl_ms.map(Duration::from_millis),
            levels: self.levels.clone(),
            tags: self.tags.clone(),
            ..CacheOptions::default()
        }
    }
}

/// Request body for `POST /cache/:pattern/lookup`
#[derive(Debug, Clone, Deserialize)]
pub struct LookupRequest {
    pub key: CacheKey,
    #[serde(default)]
    pub skip_cache: bool,
    #[serde(default)]
    pub force_refresh: bool,
    #[serde(default)]
    pub levels: Option<Vec<CacheLevel>>,
    #[serde(default)]
    pub warmup: bool,
}

impl LookupRequest {
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }

    pub fn options(&self) -> CacheOptions {
        CacheOptions {
            levels: self.levels.clone(),
            skip_cache: self.skip_cache,
            force_refresh: self.force_refresh,
            warmup: self.warmup,
            ..CacheOptions::default()
        }
    }
}

/// Request body for `POST /cache/:pattern/invalidate`
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    pub key: CacheKey,
    /// Wildcard invalidation of the key's scope
    #[serde(default)]
    pub pattern: bool,
    #[serde(default)]
    pub levels: Option<Vec<CacheLevel>>,
}

impl InvalidateRequest {
    pub fn validate(&self) -> Option<String> {
        if self.key.namespace.is_empty() {
            return Some("Key namespace cannot be empty".to_string());
        }
        None
    }

    pub fn options(&self) -> InvalidateOptions {
        InvalidateOptions {
            pattern: self.pattern,
            levels: self.levels.clone(),
        }
    }
}

/// Request body for `POST /cache/:pattern/warmup`
#[derive(Debug, Clone, Deserialize)]
pub struct WarmupRequest {
    pub keys: Vec<CacheKey>,
}

impl WarmupRequest {
    pub fn validate(&self) -> Option<String> {
        self.keys.iter().find_map(validate_key)
    }
}

/// Query for `GET /recommendation`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub access_pattern: String,
    #[serde(default)]
    pub data_size: String,
}
