//! Workout repository: sessions, sets, ownership, and history lookups.

use std::collections::HashMap;

use crate::domain::{
    ExerciseId, NewTrainingSession, NewWorkoutSet, SessionId, SetId, TrainingSession, UserId,
    WorkoutSet,
};
use crate::errors::{Error, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct SessionRow {
    pub id: String,
    pub user_id: String,
    pub performed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub session_type: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct SetRow {
    pub id: String,
    pub session_id: String,
    pub exercise_id: String,
    pub set_index: i32,
    pub reps: i32,
    pub weight_kg: f64,
    pub rpe: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<SetRow> for WorkoutSet {
    fn from(row: SetRow) -> Self {
        WorkoutSet {
            id: SetId::from_string(row.id),
            session_id: SessionId::from_string(row.session_id),
            exercise_id: ExerciseId::from_string(row.exercise_id),
            set_index: row.set_index,
            reps: row.reps,
            weight_kg: row.weight_kg,
            rpe: row.rpe,
            created_at: row.created_at,
        }
    }
}

impl From<SessionRow> for TrainingSession {
    fn from(row: SessionRow) -> Self {
        TrainingSession {
            id: SessionId::from_string(row.id),
            user_id: UserId::from_string(row.user_id),
            performed_at: row.performed_at,
            notes: row.notes,
            session_type: row.session_type,
            sets: vec![],
        }
    }
}

/// Persistence contract for sessions and sets. "Not found" is `Ok(None)` or
/// `Ok(false)`; errors are reserved for the store itself failing.
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Create a new training session
    async fn create_session(&self, session: NewTrainingSession) -> Result<TrainingSession>;

    /// Record a set against an existing session
    async fn add_set(&self, set: NewWorkoutSet) -> Result<WorkoutSet>;

    /// List a user's sessions with their sets, most recent first
    async fn list_sessions_with_sets(&self, user_id: &UserId) -> Result<Vec<TrainingSession>>;

    /// The user's most recently recorded set across all sessions, by
    /// creation order with `set_index` breaking ties
    async fn get_last_set(&self, user_id: &UserId) -> Result<Option<WorkoutSet>>;

    /// The user's most recent session by `performed_at`
    async fn get_last_session(&self, user_id: &UserId) -> Result<Option<TrainingSession>>;

    /// Whether the given session exists and is owned by the given user
    async fn session_belongs_to_user(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct SqlxWorkoutRepository {
    pool: DbPool,
}

impl SqlxWorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<TrainingSession>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, user_id, performed_at, notes, session_type FROM sessions WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to fetch session".to_string(),
        })?;

        Ok(row.map(TrainingSession::from))
    }

    async fn get_set(&self, id: &SetId) -> Result<Option<WorkoutSet>> {
        let row = sqlx::query_as::<_, SetRow>(
            "SELECT id, session_id, exercise_id, set_index, reps, weight_kg, rpe, created_at \
             FROM sets WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to fetch set".to_string(),
        })?;

        Ok(row.map(WorkoutSet::from))
    }
}

#[async_trait]
impl WorkoutRepository for SqlxWorkoutRepository {
    #[instrument(skip(self, session), fields(session_id = %session.id, user_id = %session.user_id), name = "db_create_session")]
    async fn create_session(&self, session: NewTrainingSession) -> Result<TrainingSession> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, performed_at, notes, session_type)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.id.as_str())
        .bind(session.user_id.as_str())
        .bind(session.performed_at)
        .bind(&session.notes)
        .bind(&session.session_type)
        .execute(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to create session".to_string(),
        })?;

        self.get_session(&session.id)
            .await?
            .ok_or_else(|| Error::internal("Session not found after creation"))
    }

    #[instrument(skip(self, set), fields(set_id = %set.id, session_id = %set.session_id), name = "db_add_set")]
    async fn add_set(&self, set: NewWorkoutSet) -> Result<WorkoutSet> {
        sqlx::query(
            r#"
            INSERT INTO sets (id, session_id, exercise_id, set_index, reps, weight_kg, rpe, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(set.id.as_str())
        .bind(set.session_id.as_str())
        .bind(set.exercise_id.as_str())
        .bind(set.set_index)
        .bind(set.reps)
        .bind(set.weight_kg)
        .bind(set.rpe)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to add set".to_string(),
        })?;

        self.get_set(&set.id).await?.ok_or_else(|| Error::internal("Set not found after creation"))
    }

    #[instrument(skip(self), fields(user_id = %user_id), name = "db_list_sessions")]
    async fn list_sessions_with_sets(&self, user_id: &UserId) -> Result<Vec<TrainingSession>> {
        let session_rows = sqlx::query_as::<_, SessionRow>(
            "SELECT id, user_id, performed_at, notes, session_type \
             FROM sessions WHERE user_id = $1 ORDER BY performed_at DESC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to list sessions".to_string(),
        })?;

        let set_rows = sqlx::query_as::<_, SetRow>(
            "SELECT st.id, st.session_id, st.exercise_id, st.set_index, st.reps, st.weight_kg, \
                    st.rpe, st.created_at \
             FROM sets st \
             JOIN sessions s ON st.session_id = s.id \
             WHERE s.user_id = $1 \
             ORDER BY st.set_index ASC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to list sets".to_string(),
        })?;

        let mut sets_by_session: HashMap<String, Vec<WorkoutSet>> = HashMap::new();
        for row in set_rows {
            sets_by_session
                .entry(row.session_id.clone())
                .or_default()
                .push(WorkoutSet::from(row));
        }

        Ok(session_rows
            .into_iter()
            .map(|row| {
                let mut session = TrainingSession::from(row);
                if let Some(sets) = sets_by_session.remove(session.id.as_str()) {
                    session.sets = sets;
                }
                session
            })
            .collect())
    }

    #[instrument(skip(self), fields(user_id = %user_id), name = "db_get_last_set")]
    async fn get_last_set(&self, user_id: &UserId) -> Result<Option<WorkoutSet>> {
        let row = sqlx::query_as::<_, SetRow>(
            "SELECT st.id, st.session_id, st.exercise_id, st.set_index, st.reps, st.weight_kg, \
                    st.rpe, st.created_at \
             FROM sets st \
             JOIN sessions s ON st.session_id = s.id \
             WHERE s.user_id = $1 \
             ORDER BY st.created_at DESC, st.set_index DESC \
             LIMIT 1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to fetch last set".to_string(),
        })?;

        Ok(row.map(WorkoutSet::from))
    }

    #[instrument(skip(self), fields(user_id = %user_id), name = "db_get_last_session")]
    async fn get_last_session(&self, user_id: &UserId) -> Result<Option<TrainingSession>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, user_id, performed_at, notes, session_type \
             FROM sessions WHERE user_id = $1 \
             ORDER BY performed_at DESC \
             LIMIT 1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to fetch last session".to_string(),
        })?;

        Ok(row.map(TrainingSession::from))
    }

    #[instrument(skip(self), fields(session_id = %session_id, user_id = %user_id), name = "db_session_belongs_to_user")]
    async fn session_belongs_to_user(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<bool> {
        let row = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM sessions WHERE id = $1 AND user_id = $2",
        )
        .bind(session_id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to check session ownership".to_string(),
        })?;

        Ok(row.is_some())
    }
}
