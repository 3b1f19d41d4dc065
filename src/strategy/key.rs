//! Cache keys and their derived storage strings.
//!
//! A [`CacheKey`] derives `namespace:identifier[:v<version>][:u<userId>][:<metadataHash>]`.
//! The metadata hash is computed over a key-sorted rendering so field order
//! never changes the result.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Key Part ==
/// Identifier or version component: either text or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPart {
    Int(i64),
    Text(String),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Int(n) => write!(f, "{}", n),
            KeyPart::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for KeyPart {
    fn from(s: &str) -> Self {
        KeyPart::Text(s.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(s: String) -> Self {
        KeyPart::Text(s)
    }
}

impl From<i64> for KeyPart {
    fn from(n: i64) -> Self {
        KeyPart::Int(n)
    }
}

// == Cache Key ==
/// Identifies a cacheable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheKey {
    /// Logical grouping, e.g. `claims`
    pub namespace: String,
    /// Entity key within the namespace
    pub identifier: KeyPart,
    /// Bumping the version makes older entries miss
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<KeyPart>,
    /// Scopes the key to one user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Extra disambiguators, hashed into the key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,
}

impl CacheKey {
    pub fn new(namespace: impl Into<String>, identifier: impl Into<KeyPart>) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
            version: None,
            user_id: None,
            metadata: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<KeyPart>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Adds one metadata field, creating the map on first use.
    pub fn with_metadata(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(field.into(), value.into());
        self
    }

    /// Derives the storage key string.
    pub fn storage_key(&self) -> String {
        let mut key = format!("{}:{}", self.namespace, self.identifier);

        if let Some(version) = &self.version {
            key.push_str(&format!(":v{}", version));
        }
        if let Some(user_id) = &self.user_id {
            key.push_str(&format!(":u{}", user_id));
        }
        if let Some(metadata) = &self.metadata {
            key.push(':');
            key.push_str(&metadata_hash(metadata));
        }

        key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

// == Metadata Hash ==
/// Hashes metadata into a short base-36 tag.
///
/// Objects are rendered with keys sorted at every depth, then folded with a
/// 32-bit `h * 31 + c` rolling hash over UTF-16 code units. Not collision
/// resistant; only used to tell keys apart.
pub fn metadata_hash(metadata: &BTreeMap<String, Value>) -> String {
    let canonical = Value::Object(
        metadata
            .iter()
            .map(|(k, v)| (k.clone(), canonicalize(v)))
            .collect(),
    )
    .to_string();

    let mut hash: i32 = 0;
    for unit in canonical.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }

    to_base36(hash.unsigned_abs())
}

/// Rebuilds nested objects with their keys inserted in sorted order.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
