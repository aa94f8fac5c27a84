//! In-memory database helpers for in-library tests.
//!
//! A single-connection SQLite pool keeps every query on the same in-memory
//! database for the lifetime of a test. Only available in test builds.

use crate::storage::{migrations, DbPool};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Fresh in-memory database with the schema applied.
pub async fn memory_pool() -> DbPool {
    let options =
        SqliteConnectOptions::from_str("sqlite://:memory:").expect("valid sqlite url");

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect_with(options)
        .await
        .expect("in-memory pool");

    migrations::run_migrations(&pool).await.expect("schema applied");
    pool
}
