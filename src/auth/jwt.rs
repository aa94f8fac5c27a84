//! JWT issuance and verification for liftlog identities.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::UserId;
use crate::errors::{AuthErrorType, Error, Result};

/// Issuer tag embedded in every token.
pub const ISSUER: &str = "liftlog-api";
/// Audience tag embedded in every token.
pub const AUDIENCE: &str = "liftlog-users";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,
    /// Expiration time
    pub exp: usize,
    /// Issued at time
    pub iat: usize,
    /// Unique assertion id, reserved for revocation
    pub jti: String,
    pub iss: String,
    pub aud: String,
}

/// Stateless codec for signed, time-bound identity assertions. Holds the
/// symmetric key material for the process lifetime; no storage, no side
/// effects beyond pure computation.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a codec for the given secret and fixed token lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        // Verification is strict against wall-clock time; skew is not
        // compensated.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Issue a signed token for the given user. Fails only if signing
    /// itself fails, which is an internal error.
    pub fn issue(&self, subject: &UserId) -> Result<String> {
        let now = Utc::now().timestamp() as usize;

        let claims = Claims {
            sub: subject.to_string(),
            exp: now + self.ttl.as_secs() as usize,
            iat: now,
            jti: Uuid::new_v4().to_string(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| Error::internal(format!("failed to sign token: {}", err)))
    }

    /// Validate a token and return its subject. Expired, malformed,
    /// wrongly-signed, and wrong-algorithm tokens are rejected alike; the
    /// precise cause is logged but never surfaced.
    pub fn verify(&self, token: &str) -> Result<String> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            tracing::debug!(error = %err, "token rejected");
            Error::auth("invalid token", AuthErrorType::InvalidToken)
        })?;
        Ok(data.claims.sub)
    }
}
