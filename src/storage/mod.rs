//! # Storage and Persistence
//!
//! Database connectivity and the repository layer backing the services.

pub mod migrations;
pub mod pool;
pub mod repositories;
#[cfg(test)]
pub mod test_helpers;

pub use pool::{create_pool, DbPool};
pub use repositories::{
    SqlxUserRepository, SqlxWorkoutRepository, UserRepository, WorkoutRepository,
};

use crate::errors::{Error, Result};

/// Check database connectivity
pub async fn check_connection(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| Error::Database {
        source: e,
        context: "Database connectivity check failed".to_string(),
    })?;

    Ok(())
}
