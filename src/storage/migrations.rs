//! # Database Schema Bootstrap
//!
//! The core table schema is embedded in the binary and applied on startup
//! when `auto_migrate` is enabled. Statements are idempotent so repeated
//! application is safe.

use crate::errors::{Error, Result};
use crate::storage::DbPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            TEXT PRIMARY KEY,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at    TEXT NOT NULL,
        updated_at    TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id           TEXT PRIMARY KEY,
        user_id      TEXT NOT NULL REFERENCES users(id),
        performed_at TEXT NOT NULL,
        notes        TEXT,
        session_type TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sets (
        id          TEXT PRIMARY KEY,
        session_id  TEXT NOT NULL REFERENCES sessions(id),
        exercise_id TEXT NOT NULL,
        set_index   INTEGER NOT NULL,
        reps        INTEGER NOT NULL,
        weight_kg   REAL NOT NULL,
        rpe         INTEGER,
        created_at  TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_sessions_user_performed ON sessions(user_id, performed_at)",
    "CREATE INDEX IF NOT EXISTS idx_sets_session ON sets(session_id)",
];

/// Apply the embedded schema to the given pool.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await.map_err(|err| Error::Database {
            source: err,
            context: "Failed to apply database schema".to_string(),
        })?;
    }

    info!(statements = SCHEMA.len(), "Database schema applied");
    Ok(())
}
