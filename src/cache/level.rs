//! Cache levels (storage tiers) a strategy may address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Storage tier handled by the cache manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheLevel {
    /// In-process memory, fastest and smallest
    Memory,
    /// Longer-lived tier that outlives individual requests
    Persistent,
}

impl CacheLevel {
    /// Every level, fastest first.
    pub const ALL: [CacheLevel; 2] = [CacheLevel::Memory, CacheLevel::Persistent];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheLevel::Memory => "memory",
            CacheLevel::Persistent => "persistent",
        }
    }
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheLevel {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(CacheLevel::Memory),
            "persistent" => Ok(CacheLevel::Persistent),
            other => Err(CacheError::InvalidRequest(format!(
                "Unknown cache level: {}",
                other
            ))),
        }
    }
}
