//! # inbox-db
//!
//! Storage layer implementing the inbox-core ports.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives and model -> entity mappers
//! - PostgreSQL repositories plus [`PgMessagingStore`] for transactional writes
//! - [`InMemoryStore`], a self-contained implementation of every port
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inbox_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use inbox_db::{PgMessageRepository, PgMessagingStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let messages = PgMessageRepository::new(pool.clone());
//!     let store = PgMessagingStore::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{InMemoryStore, StoreStats};
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgHistoryRepository, PgMessageRepository, PgMessagingStore, PgNotificationRepository,
    PgUserRepository,
};
