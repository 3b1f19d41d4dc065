//! Property-Based Tests for Strategy Module
//!
//! Key derivation invariants and strategy contracts over generated inputs.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cache::{CacheLevel, CacheManager, GetOptions, TieredCacheManager};
use crate::strategy::{CacheKey, CacheOptions, CacheStrategy, KeyPart, StrategyKind};

// == Strategies ==
fn key_part_strategy() -> impl Strategy<Value = KeyPart> {
    prop_oneof![
        any::<i64>().prop_map(KeyPart::Int),
        "[a-zA-Z0-9_-]{1,12}".prop_map(KeyPart::Text),
    ]
}

fn metadata_strategy() -> impl Strategy<Value = BTreeMap<String, Value>> {
    prop::collection::btree_map("[a-z]{1,6}", any::<i32>().prop_map(|n| json!(n)), 0..6)
}

fn cache_key_strategy() -> impl Strategy<Value = CacheKey> {
    (
        "[a-z]{1,8}",
        key_part_strategy(),
        prop::option::of(key_part_strategy()),
        prop::option::of("[a-z0-9-]{1,8}"),
        prop::option::of(metadata_strategy()),
    )
        .prop_map(|(namespace, identifier, version, user_id, metadata)| CacheKey {
            namespace,
            identifier,
            version,
            user_id,
            metadata,
        })
}

const ALL_KINDS: [StrategyKind; 5] = [
    StrategyKind::FrequentlyAccessed,
    StrategyKind::SessionBased,
    StrategyKind::RealTime,
    StrategyKind::ReferenceData,
    StrategyKind::Computational,
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Equal keys always derive the same storage key.
    #[test]
    fn prop_key_derivation_is_deterministic(key in cache_key_strategy()) {
        let copy = key.clone();
        prop_assert_eq!(key.storage_key(), copy.storage_key());
    }

    // Keys that differ in identity derive different storage keys.
    #[test]
    fn prop_distinct_user_or_version_changes_key(
        key in cache_key_strategy(),
        user in "[a-z0-9]{1,8}",
        version in any::<i64>()
    ) {
        let mut other_user = key.clone();
        other_user.user_id = Some(format!("{}-other", user));
        if other_user != key {
            prop_assert_ne!(key.storage_key(), other_user.storage_key());
        }

        let mut other_version = key.clone();
        other_version.version = Some(KeyPart::Int(version));
        let rendered = |k: &CacheKey| k.version.as_ref().map(ToString::to_string);
        if rendered(&other_version) != rendered(&key) {
            prop_assert_ne!(key.storage_key(), other_version.storage_key());
        }
    }

    // Building metadata in any insertion order yields the same key.
    #[test]
    fn prop_metadata_insertion_order_is_irrelevant(metadata in metadata_strategy()) {
        let fields: Vec<(String, Value)> = metadata.into_iter().collect();

        let mut forward = CacheKey::new("claims", "c-1");
        for (name, value) in fields.iter() {
            forward = forward.with_metadata(name.clone(), value.clone());
        }
        let mut backward = CacheKey::new("claims", "c-1");
        for (name, value) in fields.iter().rev() {
            backward = backward.with_metadata(name.clone(), value.clone());
        }

        prop_assert_eq!(forward.storage_key(), backward.storage_key());
    }

    // A skipped read resolves to None whatever the tier holds.
    #[test]
    fn prop_skip_cache_always_misses(
        key in cache_key_strategy(),
        kind_index in 0usize..5,
        force in any::<bool>()
    ) {
        let manager = Arc::new(TieredCacheManager::new(10, 10));
        let strategy = CacheStrategy::new(ALL_KINDS[kind_index], manager);
        let options = if force {
            CacheOptions::new().force_refresh()
        } else {
            CacheOptions::new().skip_cache()
        };

        let value: Option<Value> = tokio_test::block_on(async {
            strategy.set(&key, &json!("cached"), &CacheOptions::new()).await;
            strategy.get(&key, &options).await
        });
        prop_assert_eq!(value, None);
    }

    // RealTime never writes below memory, whatever the caller asks for.
    #[test]
    fn prop_real_time_stays_in_memory(key in cache_key_strategy(), value in any::<i64>()) {
        let manager = Arc::new(TieredCacheManager::new(10, 10));
        let strategy = CacheStrategy::new(StrategyKind::RealTime, manager.clone());
        let options = CacheOptions::new().levels(CacheLevel::ALL.to_vec());

        let persisted = tokio_test::block_on(async {
            strategy.set(&key, &value, &options).await;
            let read = GetOptions { levels: vec![CacheLevel::Persistent], promote: false };
            manager.get(&key.storage_key(), &read).await
        });
        prop_assert_eq!(persisted.unwrap(), None);
    }
}
