//! Request and Response models for the cache strategy API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    InvalidateRequest, LookupRequest, RecommendationQuery, SetRequest, WarmupRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, InvalidateResponse, LookupResponse, RecommendationResponse,
    SetResponse, StatsResponse, StrategyResponse, TierStatsResponse, WarmupResponse,
};
