//! Strategy Factory Module
//!
//! Maps cache patterns to shared strategy instances and recommends a pattern
//! for a given access profile.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::cache::CacheManager;
use crate::strategy::{AccessPattern, CachePattern, CacheStrategy, DataSize, StrategyKind};

// == Cache Strategy Factory ==
/// Registry of lazily created strategies, one per [`CachePattern`].
///
/// Built once at startup and shared by reference; every strategy it hands
/// out is bound to the same cache manager.
pub struct CacheStrategyFactory {
    manager: Arc<dyn CacheManager>,
    strategies: RwLock<HashMap<CachePattern, Arc<CacheStrategy>>>,
}

impl CacheStrategyFactory {
    // == Constructor ==
    pub fn new(manager: Arc<dyn CacheManager>) -> Self {
        Self {
            manager,
            strategies: RwLock::new(HashMap::new()),
        }
    }

    pub fn manager(&self) -> &Arc<dyn CacheManager> {
        &self.manager
    }

    /// Policy kind backing `pattern`. `user-specific` and `temporary` are
    /// aliases of the session and real-time policies.
    pub fn kind_for(pattern: CachePattern) -> StrategyKind {
        match pattern {
            CachePattern::FrequentlyAccessed => StrategyKind::FrequentlyAccessed,
            CachePattern::SessionBased | CachePattern::UserSpecific => StrategyKind::SessionBased,
            CachePattern::RealTime | CachePattern::Temporary => StrategyKind::RealTime,
            CachePattern::ReferenceData => StrategyKind::ReferenceData,
            CachePattern::Computational => StrategyKind::Computational,
        }
    }

    // == Get Strategy ==
    /// Returns the shared strategy for `pattern`, creating it on first use.
    pub fn get_strategy(&self, pattern: CachePattern) -> Arc<CacheStrategy> {
        if let Some(existing) = self
            .strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pattern)
        {
            return Arc::clone(existing);
        }

        let mut strategies = self
            .strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let strategy = strategies.entry(pattern).or_insert_with(|| {
            debug!(pattern = %pattern, "Creating cache strategy");
            Arc::new(CacheStrategy::new(
                Self::kind_for(pattern),
                Arc::clone(&self.manager),
            ))
        });
        Arc::clone(strategy)
    }

    /// Resolves a pattern by name; unknown names get the default strategy.
    pub fn strategy_for_name(&self, name: &str) -> Arc<CacheStrategy> {
        let pattern = name.parse().unwrap_or_else(|_| {
            debug!(name, "Unknown cache pattern, using frequently-accessed");
            CachePattern::FrequentlyAccessed
        });
        self.get_strategy(pattern)
    }

    // == Recommendation ==
    /// Suggests a pattern for an access profile.
    pub fn get_recommended_strategy(access: AccessPattern, size: DataSize) -> CachePattern {
        match (access, size) {
            (AccessPattern::ReadHeavy, DataSize::Large) => CachePattern::Computational,
            (AccessPattern::ReadHeavy, _) => CachePattern::FrequentlyAccessed,
            (AccessPattern::WriteHeavy, _) => CachePattern::RealTime,
            (AccessPattern::Balanced, _) => CachePattern::SessionBased,
            (AccessPattern::Burst, _) => CachePattern::RealTime,
            (AccessPattern::Streaming, _) => CachePattern::Temporary,
        }
    }

    /// String form of [`Self::get_recommended_strategy`]. Unknown access
    /// patterns yield `frequently-accessed`; unknown sizes count as not large.
    pub fn recommend_for_names(access: &str, size: &str) -> CachePattern {
        let Ok(access) = access.parse::<AccessPattern>() else {
            return CachePattern::FrequentlyAccessed;
        };
        let size = size.parse().unwrap_or(DataSize::Medium);
        Self::get_recommended_strategy(access, size)
    }

    /// Forgets every memoized strategy. Cached data is untouched.
    pub fn clear_strategies(&self) {
        self.strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    // == Convenience Accessors ==
    pub fn frequently_accessed(&self) -> Arc<CacheStrategy> {
        self.get_strategy(CachePattern::FrequentlyAccessed)
    }

    pub fn session_based(&self) -> Arc<CacheStrategy> {
        self.get_strategy(CachePattern::SessionBased)
    }

    pub fn real_time(&self) -> Arc<CacheStrategy> {
        self.get_strategy(CachePattern::RealTime)
    }

    pub fn reference_data(&self) -> Arc<CacheStrategy> {
        self.get_strategy(CachePattern::ReferenceData)
    }

    pub fn computational(&self) -> Arc<CacheStrategy> {
        self.get_strategy(CachePattern::Computational)
    }

    pub fn user_specific(&self) -> Arc<CacheStrategy> {
        self.get_strategy(CachePattern::UserSpecific)
    }

    pub fn temporary(&self) -> Arc<CacheStrategy> {
        self.get_strategy(CachePattern::Temporary)
    }
}
