//! ReelShare Common Library
//!
//! Shared code for the ReelShare backend including:
//! - Database models, query composition, and repository pattern
//! - Error types and handling
//! - Configuration management
//! - Authentication utilities (JWT + password hashing)
//! - Metrics and observability
//! - Relative-time formatting for movie listings

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod timeago;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, MovieRecord, Repository, SortKey};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
