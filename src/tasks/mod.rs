//! Background Tasks Module
//!
//! Tasks that run periodically while the service is up.
//!
//! # Tasks
//! - TTL Cleanup: purges expired entries from every cache tier

mod cleanup;

pub use cleanup::spawn_cleanup_task;
