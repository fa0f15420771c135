//! Database layer
//!
//! This module provides database abstraction for the GlobalNest service.
//! It supports:
//! - SQLite (default, for single-binary deployment)
//! - PostgreSQL (for hosted deployments)
//!
//! The database driver is selected based on configuration.
//!
//! # Architecture
//!
//! The database layer uses a trait-based abstraction (`DatabasePool`) that
//! allows the application to work with either SQLite or PostgreSQL without
//! knowing the specific backend.
//!
//! # Usage
//!
//! ```ignore
//! use globalnest::config::DatabaseConfig;
//! use globalnest::db::{create_pool, DatabasePool, migrations};
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, PostgresDatabase, SqliteDatabase,
};
