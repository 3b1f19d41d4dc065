//! Strategy policy vocabulary and the immutable per-strategy configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{duration_to_millis, CacheLevel};
use crate::error::CacheError;

// == Cache Pattern ==
/// Declared data-access pattern a caller asks a strategy for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePattern {
    FrequentlyAccessed,
    SessionBased,
    RealTime,
    ReferenceData,
    UserSpecific,
    Computational,
    Temporary,
}

impl CachePattern {
    pub const ALL: [CachePattern; 7] = [
        CachePattern::FrequentlyAccessed,
        CachePattern::SessionBased,
        CachePattern::RealTime,
        CachePattern::ReferenceData,
        CachePattern::UserSpecific,
        CachePattern::Computational,
        CachePattern::Temporary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CachePattern::FrequentlyAccessed => "frequently-accessed",
            CachePattern::SessionBased => "session-based",
            CachePattern::RealTime => "real-time",
            CachePattern::ReferenceData => "reference-data",
            CachePattern::UserSpecific => "user-specific",
            CachePattern::Computational => "computational",
            CachePattern::Temporary => "temporary",
        }
    }
}

impl fmt::Display for CachePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachePattern {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CachePattern::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CacheError::InvalidRequest(format!("Unknown cache pattern: {}", s)))
    }
}

// == Access Pattern ==
/// Read/write mix of the data being cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessPattern {
    ReadHeavy,
    WriteHeavy,
    Balanced,
    Burst,
    Streaming,
}

impl AccessPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessPattern::ReadHeavy => "read-heavy",
            AccessPattern::WriteHeavy => "write-heavy",
            AccessPattern::Balanced => "balanced",
            AccessPattern::Burst => "burst",
            AccessPattern::Streaming => "streaming",
        }
    }
}

impl fmt::Display for AccessPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessPattern {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read-heavy" => Ok(AccessPattern::ReadHeavy),
            "write-heavy" => Ok(AccessPattern::WriteHeavy),
            "balanced" => Ok(AccessPattern::Balanced),
            "burst" => Ok(AccessPattern::Burst),
            "streaming" => Ok(AccessPattern::Streaming),
            other => Err(CacheError::InvalidRequest(format!(
                "Unknown access pattern: {}",
                other
            ))),
        }
    }
}

// == Data Size ==
/// Rough size class of a cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataSize {
    Small,
    Medium,
    Large,
}

impl FromStr for DataSize {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(DataSize::Small),
            "medium" => Ok(DataSize::Medium),
            "large" => Ok(DataSize::Large),
            other => Err(CacheError::InvalidRequest(format!("Unknown data size: {}", other))),
        }
    }
}

// == Policy Tags ==
/// Write policy a strategy follows. Descriptive; each strategy's own
/// get/set logic is what enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    WriteThrough,
    CacheAside,
    WriteAround,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidationStrategy {
    TimeBased,
    EventBased,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarmupStrategy {
    Eager,
    Lazy,
    Scheduled,
}

// == Strategy Config ==
/// Policy owned by one strategy instance, fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStrategyConfig {
    pub pattern: CachePattern,
    pub access_pattern: AccessPattern,
    /// Tiers used when the caller does not override them
    pub levels: Vec<CacheLevel>,
    pub strategy: WritePolicy,
    /// Default lifetime of written entries
    #[serde(rename = "ttl_ms", serialize_with = "serialize_millis")]
    pub ttl: Duration,
    /// Forwarded to the cache manager; not applied here
    pub compression: bool,
    /// Forwarded to the cache manager; not applied here
    pub encryption: bool,
    pub invalidation_strategy: InvalidationStrategy,
    pub warmup_strategy: Option<WarmupStrategy>,
}

fn serialize_millis<S: serde::Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration_to_millis(*ttl))
}
