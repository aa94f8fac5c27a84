//! Session logging: create sessions, record sets, list history.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::domain::{
    ExerciseId, NewTrainingSession, NewWorkoutSet, SessionId, SetId, TrainingSession, UserId,
    WorkoutSet,
};
use crate::errors::{Error, Result};
use crate::storage::repositories::WorkoutRepository;

/// Input for creating a training session.
#[derive(Debug, Clone, Default)]
pub struct CreateSessionRequest {
    /// Defaults to now (UTC) when absent.
    pub performed_at: Option<DateTime<Utc>>,
    pub session_type: Option<String>,
    pub notes: Option<String>,
}

/// Input for recording a set against an existing session.
#[derive(Debug, Clone)]
pub struct AddSetRequest {
    pub session_id: SessionId,
    pub exercise_id: ExerciseId,
    pub set_index: i32,
    pub reps: i32,
    pub weight_kg: f64,
    pub rpe: Option<i32>,
}

/// Service for session and set mutations.
#[derive(Clone)]
pub struct SessionService {
    workouts: Arc<dyn WorkoutRepository>,
}

impl SessionService {
    pub fn new(workouts: Arc<dyn WorkoutRepository>) -> Self {
        Self { workouts }
    }

    #[instrument(skip(self, request), fields(user_id = %user_id))]
    pub async fn create_session(
        &self,
        user_id: &UserId,
        request: CreateSessionRequest,
    ) -> Result<TrainingSession> {
        let performed_at = request.performed_at.unwrap_or_else(Utc::now);

        let session = self
            .workouts
            .create_session(NewTrainingSession {
                id: SessionId::new(),
                user_id: user_id.clone(),
                performed_at,
                notes: request.notes,
                session_type: request.session_type,
            })
            .await?;

        info!(session_id = %session.id, "training session created");
        Ok(session)
    }

    /// Record a set. The ownership check runs against the store immediately
    /// before the insert; a session that is absent or owned by another user
    /// yields the same error.
    #[instrument(skip(self, request), fields(user_id = %user_id, session_id = %request.session_id))]
    pub async fn add_set(&self, user_id: &UserId, request: AddSetRequest) -> Result<WorkoutSet> {
        let owned =
            self.workouts.session_belongs_to_user(&request.session_id, user_id).await?;
        if !owned {
            return Err(Error::forbidden("session not found"));
        }

        let set = self
            .workouts
            .add_set(NewWorkoutSet {
                id: SetId::new(),
                session_id: request.session_id,
                exercise_id: request.exercise_id,
                set_index: request.set_index,
                reps: request.reps,
                weight_kg: request.weight_kg,
                rpe: request.rpe,
            })
            .await?;

        info!(set_id = %set.id, "set recorded");
        Ok(set)
    }

    /// List the user's sessions with their sets, most recent first.
    pub async fn list_sessions(&self, user_id: &UserId) -> Result<Vec<TrainingSession>> {
        self.workouts.list_sessions_with_sets(user_id).await
    }
}
