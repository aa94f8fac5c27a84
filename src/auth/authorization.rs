//! Request-scoped authentication and ownership checks.
//!
//! The gate between an inbound request and the services: it turns a bearer
//! token into a verified identity and checks that a referenced session
//! belongs to that identity before any mutation. No state survives a call.

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::auth::auth_service::AuthService;
use crate::domain::{SessionId, UserId};
use crate::errors::{AuthErrorType, Error};
use crate::storage::repositories::WorkoutRepository;

/// Identity bound to a single request after successful authentication.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: UserId,
}

/// Errors surfaced by the gate. Expired, malformed, and wrongly-signed
/// tokens all present as `InvalidToken`; an absent session and a session
/// owned by someone else both present as `Forbidden`.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("forbidden")]
    Forbidden,
    #[error(transparent)]
    Persistence(Error),
}

impl From<Error> for AuthError {
    fn from(err: Error) -> Self {
        AuthError::Persistence(err)
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => Error::auth("missing token", AuthErrorType::MissingToken),
            AuthError::InvalidToken => Error::auth("invalid token", AuthErrorType::InvalidToken),
            AuthError::Forbidden => Error::forbidden("session not found"),
            AuthError::Persistence(inner) => inner,
        }
    }
}

/// Pull a bearer token out of an Authorization header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// The authorization gate.
#[derive(Clone)]
pub struct Authorizer {
    auth: Arc<AuthService>,
    workouts: Arc<dyn WorkoutRepository>,
}

impl Authorizer {
    pub fn new(auth: Arc<AuthService>, workouts: Arc<dyn WorkoutRepository>) -> Self {
        Self { auth, workouts }
    }

    /// Resolve a bearer token to an identity.
    ///
    /// Does not consult the store: a token whose subject has since been
    /// deleted still authenticates here. Callers needing strict consistency
    /// must resolve the user themselves before acting.
    #[instrument(skip(self, authorization_header))]
    pub fn authenticate(&self, authorization_header: &str) -> Result<AuthContext, AuthError> {
        let Some(token) = extract_bearer_token(authorization_header.trim()) else {
            return Err(AuthError::MissingToken);
        };

        match self.auth.verify_token(token) {
            Ok(user_id) => Ok(AuthContext { user_id }),
            Err(err) => {
                warn!(error = %err, "token verification failed");
                Err(AuthError::InvalidToken)
            }
        }
    }

    /// Ownership check for a session, run against the store on every call.
    #[instrument(skip(self, context), fields(user_id = %context.user_id, session_id = %session_id))]
    pub async fn authorize_session_access(
        &self,
        context: &AuthContext,
        session_id: &SessionId,
    ) -> Result<(), AuthError> {
        let owned = self.workouts.session_belongs_to_user(session_id, &context.user_id).await?;
        if owned {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenCodec;
    use crate::auth::user::{NewUser, User};
    use crate::domain::{NewTrainingSession, NewWorkoutSet, TrainingSession, WorkoutSet};
    use crate::errors::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct NullUsers;

    #[async_trait]
    impl crate::storage::repositories::UserRepository for NullUsers {
        async fn create_user(&self, new_user: NewUser) -> Result<User> {
            Ok(User {
                id: new_user.id,
                email: new_user.email,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        }

        async fn get_user(&self, _id: &UserId) -> Result<Option<User>> {
            Ok(None)
        }

        async fn get_user_by_email(&self, _email: &str) -> Result<Option<User>> {
            Ok(None)
        }

        async fn get_user_with_password(&self, _email: &str) -> Result<Option<(User, String)>> {
            Ok(None)
        }
    }

    /// Ownership map only; the remaining repository surface is unused here.
    #[derive(Default)]
    struct OwnershipOnly {
        owners: Mutex<HashMap<String, UserId>>,
    }

    impl OwnershipOnly {
        fn with_session(session_id: &SessionId, owner: &UserId) -> Self {
            let repo = Self::default();
            repo.owners.lock().unwrap().insert(session_id.to_string(), owner.clone());
            repo
        }
    }

    #[async_trait]
    impl WorkoutRepository for OwnershipOnly {
        async fn create_session(&self, _session: NewTrainingSession) -> Result<TrainingSession> {
            unreachable!("not exercised by gate tests")
        }

        async fn add_set(&self, _set: NewWorkoutSet) -> Result<WorkoutSet> {
            unreachable!("not exercised by gate tests")
        }

        async fn list_sessions_with_sets(&self, _user_id: &UserId) -> Result<Vec<TrainingSession>> {
            Ok(vec![])
        }

        async fn get_last_set(&self, _user_id: &UserId) -> Result<Option<WorkoutSet>> {
            Ok(None)
        }

        async fn get_last_session(&self, _user_id: &UserId) -> Result<Option<TrainingSession>> {
            Ok(None)
        }

        async fn session_belongs_to_user(
            &self,
            session_id: &SessionId,
            user_id: &UserId,
        ) -> Result<bool> {
            Ok(self
                .owners
                .lock()
                .unwrap()
                .get(session_id.as_str())
                .is_some_and(|owner| owner == user_id))
        }
    }

    fn auth_service() -> Arc<AuthService> {
        Arc::new(AuthService::new(
            Arc::new(NullUsers),
            TokenCodec::new(b"test-secret-with-enough-length-0000", Duration::from_secs(86_400)),
        ))
    }

    fn authorizer(workouts: OwnershipOnly) -> Authorizer {
        Authorizer::new(auth_service(), Arc::new(workouts))
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn missing_token_is_rejected() {
        let gate = authorizer(OwnershipOnly::default());

        assert!(matches!(gate.authenticate(""), Err(AuthError::MissingToken)));
        assert!(matches!(gate.authenticate("Basic abc"), Err(AuthError::MissingToken)));
    }

    #[test]
    fn invalid_token_is_rejected_generically() {
        let gate = authorizer(OwnershipOnly::default());

        let err = gate.authenticate("Bearer not.a.token").unwrap_err();
        assert_eq!(err.to_string(), "invalid token");
    }

    #[test]
    fn valid_token_binds_identity() {
        let gate = authorizer(OwnershipOnly::default());

        // Mint through the same codec configuration the service holds.
        let user_id = UserId::new();
        let codec =
            TokenCodec::new(b"test-secret-with-enough-length-0000", Duration::from_secs(86_400));
        let token = codec.issue(&user_id).unwrap();

        let context = gate.authenticate(&format!("Bearer {}", token)).unwrap();
        assert_eq!(context.user_id, user_id);
    }

    #[tokio::test]
    async fn owner_is_granted_access() {
        let session_id = SessionId::new();
        let owner = UserId::new();
        let gate = authorizer(OwnershipOnly::with_session(&session_id, &owner));

        let context = AuthContext { user_id: owner };
        assert!(gate.authorize_session_access(&context, &session_id).await.is_ok());
    }

    #[tokio::test]
    async fn foreign_and_missing_sessions_are_indistinguishable() {
        let session_id = SessionId::new();
        let owner = UserId::new();
        let gate = authorizer(OwnershipOnly::with_session(&session_id, &owner));

        let intruder = AuthContext { user_id: UserId::new() };
        let foreign = gate.authorize_session_access(&intruder, &session_id).await.unwrap_err();
        let missing =
            gate.authorize_session_access(&intruder, &SessionId::new()).await.unwrap_err();

        assert!(matches!(foreign, AuthError::Forbidden));
        assert!(matches!(missing, AuthError::Forbidden));
        assert_eq!(foreign.to_string(), missing.to_string());
    }

    #[test]
    fn gate_errors_map_to_core_classifications() {
        assert!(matches!(
            Error::from(AuthError::MissingToken),
            Error::Auth { error_type: AuthErrorType::MissingToken, .. }
        ));
        assert!(matches!(
            Error::from(AuthError::InvalidToken),
            Error::Auth { error_type: AuthErrorType::InvalidToken, .. }
        ));
        assert!(matches!(Error::from(AuthError::Forbidden), Error::Forbidden { .. }));
    }
}
