//! API Module
//!
//! HTTP handlers and routing for operating cache strategies over REST.
//!
//! # Endpoints
//! - `GET/PUT /cache/:pattern` - Describe a strategy / write through it
//! - `POST /cache/:pattern/{lookup,invalidate,warmup}` - Strategy operations
//! - `GET /recommendation` - Pattern recommendation
//! - `GET /stats` - Per-tier statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
