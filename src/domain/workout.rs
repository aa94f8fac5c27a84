//! Training session and set domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ExerciseId, SessionId, SetId, UserId};

/// Stored representation of a training session and the sets recorded in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub performed_at: DateTime<Utc>,
    pub notes: Option<String>,
    /// Open-ended tag such as "upper" or "lower"; not a closed enum.
    pub session_type: Option<String>,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

/// New session database payload.
#[derive(Debug, Clone)]
pub struct NewTrainingSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub performed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub session_type: Option<String>,
}

/// A single recorded set. Ownership runs Set -> Session -> User; a set never
/// stores a user id of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub id: SetId,
    pub session_id: SessionId,
    pub exercise_id: ExerciseId,
    pub set_index: i32,
    pub reps: i32,
    pub weight_kg: f64,
    pub rpe: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// New set database payload.
#[derive(Debug, Clone)]
pub struct NewWorkoutSet {
    pub id: SetId,
    pub session_id: SessionId,
    pub exercise_id: ExerciseId,
    pub set_index: i32,
    pub reps: i32,
    pub weight_kg: f64,
    pub rpe: Option<i32>,
}
