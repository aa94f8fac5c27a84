//! # liftlog
//!
//! Workout-tracking backend core: credential issuance and signed-token
//! lifecycle, per-resource ownership enforcement, and a deterministic
//! progression recommendation engine.
//!
//! The crate is a library consumed by an external HTTP layer. Routing,
//! request-shape validation, rate limiting, and deployment wiring live
//! there; this crate owns the semantics.
//!
//! ## Architecture
//!
//! ```text
//! HTTP layer → Authorizer (authenticate, ownership check)
//!            → AuthService / SessionService / PlanService
//!            → repositories (SQLx) → SQLite
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use liftlog::auth::{AuthService, Authorizer, TokenCodec};
//! use liftlog::services::{PlanService, SessionService};
//! use liftlog::storage::{create_pool, SqlxUserRepository, SqlxWorkoutRepository};
//! use liftlog::{AppConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let pool = create_pool(&config.database).await?;
//!
//!     let users = Arc::new(SqlxUserRepository::new(pool.clone()));
//!     let workouts = Arc::new(SqlxWorkoutRepository::new(pool));
//!
//!     let codec = TokenCodec::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl());
//!     let auth = Arc::new(AuthService::new(users, codec));
//!     let _gate = Authorizer::new(auth.clone(), workouts.clone());
//!     let _sessions = SessionService::new(workouts.clone());
//!     let _plans = PlanService::new(workouts);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod services;
pub mod storage;

pub use crate::config::AppConfig;
pub use crate::errors::{Error, Result};
