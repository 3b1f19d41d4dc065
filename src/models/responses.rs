//! Response DTOs for the cache strategy API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheLevel, TierStats};
use crate::strategy::{CachePattern, CacheStrategyConfig};

/// Response body for `PUT /cache/:pattern`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub message: String,
    pub storage_key: String,
}

impl SetResponse {
    pub fn new(strategy: &str, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        Self {
            message: format!("Key '{}' written via {}", storage_key, strategy),
            storage_key,
        }
    }
}

/// Response body for `POST /cache/:pattern/lookup`
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    /// Whether a live value was found
    pub hit: bool,
    pub value: Option<Value>,
    pub storage_key: String,
}

impl LookupResponse {
    pub fn new(storage_key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            hit: value.is_some(),
            value,
            storage_key: storage_key.into(),
        }
    }
}

/// Response body for `POST /cache/:pattern/invalidate`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    pub storage_key: String,
}

impl InvalidateResponse {
    pub fn new(storage_key: impl Into<String>, pattern: bool) -> Self {
        let storage_key = storage_key.into();
        let scope = if pattern { "scope of" } else { "key" };
        Self {
            message: format!("Invalidated {} '{}'", scope, storage_key),
            storage_key,
        }
    }
}

/// Response body for `POST /cache/:pattern/warmup`
#[derive(Debug, Clone, Serialize)]
pub struct WarmupResponse {
    pub message: String,
    /// Keys found and pulled forward
    pub warmed: usize,
    pub requested: usize,
}

impl WarmupResponse {
    pub fn new(warmed: usize, requested: usize) -> Self {
        Self {
            message: format!("Warmed {} of {} keys", warmed, requested),
            warmed,
            requested,
        }
    }
}

/// Response body for `GET /cache/:pattern`
#[derive(Debug, Clone, Serialize)]
pub struct StrategyResponse {
    pub strategy: String,
    pub config: CacheStrategyConfig,
}

/// Response body for `GET /recommendation`
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub pattern: CachePattern,
}

/// Counters for one tier in `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct TierStatsResponse {
    pub level: CacheLevel,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<TierStats> for TierStatsResponse {
    fn from(stats: TierStats) -> Self {
        Self {
            level: stats.level,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub tiers: Vec<TierStatsResponse>,
}

impl StatsResponse {
    pub fn new(stats: Vec<TierStats>) -> Self {
        Self {
            tiers: stats.into_iter().map(TierStatsResponse::from).collect(),
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
