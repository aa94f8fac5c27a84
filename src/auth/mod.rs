//! Authentication and authorization module entry point.
//!
//! Exposes the credential service (signup/login/verify), the token codec,
//! and the request-scoped authorization gate.

pub mod auth_service;
pub mod authorization;
mod hashing;
pub mod jwt;
pub mod user;

pub use auth_service::AuthService;
pub use authorization::{extract_bearer_token, AuthContext, AuthError, Authorizer};
pub use jwt::{Claims, TokenCodec};
pub use user::{NewUser, User};
