//! Credential service: signup, login, and token verification.
//!
//! The only component allowed to hash passwords or mint tokens. Stateless
//! per call; the signing secret lives in the injected [`TokenCodec`].

use std::sync::{Arc, LazyLock};

use tracing::{info, instrument, warn};

use crate::auth::hashing;
use crate::auth::jwt::TokenCodec;
use crate::auth::user::{NewUser, User};
use crate::domain::UserId;
use crate::errors::{AuthErrorType, Error, Result};
use crate::storage::repositories::UserRepository;

/// Pre-computed dummy hash for timing-safe user enumeration prevention.
/// When a non-existent email is used, we still run Argon2 verification
/// against this hash so the response time matches real verification.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hashing::hash_password("dummy_startup_value")
        .unwrap_or_else(|_| "$argon2id$v=19$m=768,t=1,p=1$dW5rbm93bg$dW5rbm93bg".to_string())
});

/// Wrong password and unknown email must be indistinguishable.
const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Service for credential issuance and verification.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    codec: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, codec: TokenCodec) -> Self {
        Self { users, codec: Arc::new(codec) }
    }

    /// Create an account and issue its first token. A duplicate email
    /// surfaces as a conflict with no field detail; everything else the
    /// caller sees is the user plus a usable token.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn signup(&self, email: &str, password: &str) -> Result<(User, String)> {
        let password_hash = hashing::hash_password(password)?;

        let user = self
            .users
            .create_user(NewUser {
                id: UserId::new(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        let token = self.codec.issue(&user.id)?;
        info!(user_id = %user.id, "user signed up");
        Ok((user, token))
    }

    /// Authenticate with email and password and issue a fresh token.
    ///
    /// Unknown email and wrong password return the same error value; the
    /// unknown-email path still burns an Argon2 verification so the two
    /// cannot be told apart by timing either.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let (user, password_hash) = match self.users.get_user_with_password(email).await? {
            Some(found) => found,
            None => {
                if let Err(err) = hashing::verify_password(password, &DUMMY_HASH) {
                    warn!(error = %err, "dummy hash verification failed unexpectedly");
                }
                warn!("login attempt for non-existent user");
                return Err(Error::auth(INVALID_CREDENTIALS, AuthErrorType::InvalidCredentials));
            }
        };

        if !hashing::verify_password(password, &password_hash)? {
            warn!(user_id = %user.id, "login attempt with incorrect password");
            return Err(Error::auth(INVALID_CREDENTIALS, AuthErrorType::InvalidCredentials));
        }

        let token = self.codec.issue(&user.id)?;
        info!(user_id = %user.id, "user logged in");
        Ok((user, token))
    }

    /// Verify a token and return its subject. Every codec rejection reaches
    /// the caller as the single invalid-token classification.
    pub fn verify_token(&self, token: &str) -> Result<UserId> {
        let subject = self.codec.verify(token)?;
        Ok(UserId::from_string(subject))
    }
}
