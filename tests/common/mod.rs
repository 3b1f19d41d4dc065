//! Shared test doubles for integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing_subscriber::fmt::MakeWriter;

use cache_strategies::cache::{
    glob_matches, CacheLevel, CacheManager, GetOptions, SetOptions, TierStats,
    TieredCacheManager,
};
use cache_strategies::error::{CacheError, Result};

/// One call observed by [`RecordingManager`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get {
        key: String,
        levels: Vec<CacheLevel>,
        promote: bool,
    },
    Set {
        key: String,
        levels: Vec<CacheLevel>,
        skip_lower_levels: bool,
        ttl: Duration,
    },
    Delete {
        key: String,
        levels: Vec<CacheLevel>,
    },
    DeletePattern {
        pattern: String,
        levels: Vec<CacheLevel>,
    },
    DeleteTagged {
        tag: String,
    },
    DeleteScope {
        namespace: String,
        user_id: String,
        levels: Vec<CacheLevel>,
    },
}

/// Wraps a working [`TieredCacheManager`], records every call and fails
/// the ones whose key matches `fail_matching`.
pub struct RecordingManager {
    pub inner: TieredCacheManager,
    calls: Mutex<Vec<Call>>,
    fail_matching: Option<String>,
}

impl RecordingManager {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: TieredCacheManager::new(100, 100),
            calls: Mutex::new(Vec::new()),
            fail_matching: None,
        })
    }

    /// Every operation on a key matching `pattern` fails.
    pub fn failing(pattern: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: TieredCacheManager::new(100, 100),
            calls: Mutex::new(Vec::new()),
            fail_matching: Some(pattern.to_string()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Set { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, key: &str) -> Result<()> {
        match &self.fail_matching {
            Some(pattern) if glob_matches(pattern, key) => {
                Err(CacheError::Unavailable(format!("injected fault for {}", key)))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CacheManager for RecordingManager {
    async fn get(&self, key: &str, options: &GetOptions) -> Result<Option<Value>> {
        self.record(Call::Get {
            key: key.to_string(),
            levels: options.levels.clone(),
            promote: options.promote,
        });
        self.check(key)?;
        self.inner.get(key, options).await
    }

    async fn set(&self, key: &str, value: Value, options: &SetOptions) -> Result<()> {
        self.record(Call::Set {
            key: key.to_string(),
            levels: options.levels.clone(),
            skip_lower_levels: options.skip_lower_levels,
            ttl: options.ttl,
        });
        self.check(key)?;
        self.inner.set(key, value, options).await
    }

    async fn delete(&self, key: &str, levels: &[CacheLevel]) -> Result<()> {
        self.record(Call::Delete {
            key: key.to_string(),
            levels: levels.to_vec(),
        });
        self.check(key)?;
        self.inner.delete(key, levels).await
    }

    async fn delete_pattern(&self, pattern: &str, levels: &[CacheLevel]) -> Result<usize> {
        self.record(Call::DeletePattern {
            pattern: pattern.to_string(),
            levels: levels.to_vec(),
        });
        self.check(pattern)?;
        self.inner.delete_pattern(pattern, levels).await
    }

    async fn delete_tagged(&self, tag: &str, levels: &[CacheLevel]) -> Result<usize> {
        self.record(Call::DeleteTagged {
            tag: tag.to_string(),
        });
        self.check(tag)?;
        self.inner.delete_tagged(tag, levels).await
    }

    async fn delete_scope(
        &self,
        namespace: &str,
        user_id: &str,
        levels: &[CacheLevel],
    ) -> Result<usize> {
        self.record(Call::DeleteScope {
            namespace: namespace.to_string(),
            user_id: user_id.to_string(),
            levels: levels.to_vec(),
        });
        self.check(namespace)?;
        self.inner.delete_scope(namespace, user_id, levels).await
    }

    async fn stats(&self) -> Vec<TierStats> {
        self.inner.stats().await
    }
}

/// Log sink for asserting on emitted tracing events.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
