//! # engage-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `engage-core`. It handles:
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use engage_db::pool::{create_pool, DatabaseConfig};
//! use engage_db::repositories::PgRuleRepository;
//! use engage_core::traits::RuleRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let rule_repo = PgRuleRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgBroadcastRepository, PgChannelAccountRepository, PgContentStore, PgCustomerDirectory,
    PgCustomerTagRepository, PgHealthCheck, PgImmediateRepository, PgInboundLogRepository,
    PgOutboxRepository, PgRuleRepository,
};
