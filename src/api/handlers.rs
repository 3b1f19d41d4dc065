//! API Handlers
//!
//! HTTP request handlers for each cache strategy endpoint.
//!
//! Strategy operations never fail; the only error responses come from
//! request validation.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::CacheManager;
use crate::error::{CacheError, Result};
use crate::models::{
    HealthResponse, InvalidateRequest, InvalidateResponse, LookupRequest, LookupResponse,
    RecommendationQuery, RecommendationResponse, SetRequest, SetResponse, StatsResponse,
    StrategyResponse, WarmupRequest, WarmupResponse,
};
use crate::strategy::CacheStrategyFactory;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Strategy registry bound to the service's cache manager
    pub strategies: Arc<CacheStrategyFactory>,
}

impl AppState {
    /// Creates a new AppState whose strategies share `manager`.
    pub fn new(manager: Arc<dyn CacheManager>) -> Self {
        Self {
            strategies: Arc::new(CacheStrategyFactory::new(manager)),
        }
    }
}

fn reject_invalid(error: Option<String>) -> Result<()> {
    match error {
        Some(message) => Err(CacheError::InvalidRequest(message)),
        None => Ok(()),
    }
}

/// Handler for `GET /cache/:pattern`
///
/// Describes the strategy the pattern resolves to.
pub async fn strategy_handler(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
) -> Json<StrategyResponse> {
    let strategy = state.strategies.strategy_for_name(&pattern);

    Json(StrategyResponse {
        strategy: strategy.kind().name().to_string(),
        config: strategy.config().clone(),
    })
}

/// Handler for `PUT /cache/:pattern`
pub async fn set_handler(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    reject_invalid(req.validate())?;

    let strategy = state.strategies.strategy_for_name(&pattern);
    strategy.set(&req.key, &req.value, &req.options()).await;

    Ok(Json(SetResponse::new(
        strategy.kind().name(),
        req.key.storage_key(),
    )))
}

/// Handler for `POST /cache/:pattern/lookup`
pub async fn lookup_handler(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
    Json(req): Json<LookupRequest>,
) -> Result<Json<LookupResponse>> {
    reject_invalid(req.validate())?;

    let strategy = state.strategies.strategy_for_name(&pattern);
    let value: Option<Value> = strategy.get(&req.key, &req.options()).await;

    Ok(Json(LookupResponse::new(req.key.storage_key(), value)))
}

/// Handler for `POST /cache/:pattern/invalidate`
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    reject_invalid(req.validate())?;

    let strategy = state.strategies.strategy_for_name(&pattern);
    let options = req.options();
    strategy.invalidate(&req.key, &options).await;

    Ok(Json(InvalidateResponse::new(
        req.key.storage_key(),
        options.pattern,
    )))
}

/// Handler for `POST /cache/:pattern/warmup`
pub async fn warmup_handler(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
    Json(req): Json<WarmupRequest>,
) -> Result<Json<WarmupResponse>> {
    reject_invalid(req.validate())?;

    let strategy = state.strategies.strategy_for_name(&pattern);
    let warmed = strategy.warmup(&req.keys).await;

    Ok(Json(WarmupResponse::new(warmed, req.keys.len())))
}

/// Handler for `GET /recommendation`
pub async fn recommendation_handler(
    Query(query): Query<RecommendationQuery>,
) -> Json<RecommendationResponse> {
    Json(RecommendationResponse {
        pattern: CacheStrategyFactory::recommend_for_names(
            &query.access_pattern,
            &query.data_size,
        ),
    })
}

/// Handler for `GET /stats`
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.strategies.manager().stats().await;
    Json(StatsResponse::new(stats))
}

/// Handler for `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TieredCacheManager;
    use crate::strategy::{CacheKey, CachePattern};
    use serde_json::json;

    fn state() -> AppState {
        AppState::new(Arc::new(TieredCacheManager::new(100, 100)))
    }

    fn set_request(key: CacheKey, value: Value) -> SetRequest {
        SetRequest {
            key,
            value,
            ttl_ms: None,
            levels: None,
            tags: Vec::new(),
        }
    }

    fn lookup_request(key: CacheKey) -> LookupRequest {
        LookupRequest {
            key,
            skip_cache: false,
            force_refresh: false,
            levels: None,
            warmup: false,
        }
    }

    #[tokio::test]
    async fn test_set_and_lookup_handler() {
        let state = state();
        let key = CacheKey::new("claims", "c-42");

        let req = set_request(key.clone(), json!({"status": "open"}));
        let result = set_handler(
            State(state.clone()),
            Path("frequently-accessed".to_string()),
            Json(req),
        )
        .await;
        assert!(result.is_ok());

        let response = lookup_handler(
            State(state),
            Path("frequently-accessed".to_string()),
            Json(lookup_request(key)),
        )
        .await
        .unwrap();
        assert!(response.hit);
        assert_eq!(response.value, Some(json!({"status": "open"})));
    }

    #[tokio::test]
    async fn test_lookup_miss() {
        let response = lookup_handler(
            State(state()),
            Path("computational".to_string()),
            Json(lookup_request(CacheKey::new("risk", "nothing"))),
        )
        .await
        .unwrap();

        assert!(!response.hit);
        assert_eq!(response.storage_key, "risk:nothing");
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let state = state();
        let key = CacheKey::new("claims", "c-1");

        set_handler(
            State(state.clone()),
            Path("reference-data".to_string()),
            Json(set_request(key.clone(), json!(1))),
        )
        .await
        .unwrap();

        let req = InvalidateRequest {
            key: key.clone(),
            pattern: false,
            levels: None,
        };
        invalidate_handler(State(state.clone()), Path("reference-data".to_string()), Json(req))
            .await
            .unwrap();

        let response = lookup_handler(
            State(state),
            Path("reference-data".to_string()),
            Json(lookup_request(key)),
        )
        .await
        .unwrap();
        assert!(!response.hit);
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let req = set_request(CacheKey::new("", "c-1"), json!(1));
        let result = set_handler(State(state()), Path("real-time".to_string()), Json(req)).await;

        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_strategy_handler_unknown_pattern_uses_default() {
        let response = strategy_handler(State(state()), Path("mystery".to_string())).await;

        assert_eq!(response.strategy, "FrequentlyAccessed");
        assert_eq!(response.config.pattern, CachePattern::FrequentlyAccessed);
    }

    #[tokio::test]
    async fn test_recommendation_handler() {
        let query = RecommendationQuery {
            access_pattern: "read-heavy".to_string(),
            data_size: "large".to_string(),
        };
        let response = recommendation_handler(Query(query)).await;
        assert_eq!(response.pattern, CachePattern::Computational);
    }

    #[tokio::test]
    async fn test_stats_handler_lists_both_tiers() {
        let response = stats_handler(State(state())).await;
        assert_eq!(response.tiers.len(), 2);
        assert!(response.tiers.iter().all(|t| t.hits == 0));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
