//! Progression suggestions derived from recorded training history.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{ExerciseId, UserId};
use crate::errors::Result;
use crate::storage::repositories::WorkoutRepository;

/// Rep count at or above which the load goes up.
const UPPER_REP_RANGE: i32 = 12;
/// Rep count at or below which the rep target drops.
const LOWER_REP_RANGE: i32 = 6;
const WEIGHT_INCREMENT_KG: f64 = 2.5;
const DEFAULT_WEIGHT_KG: f64 = 20.0;
const DEFAULT_REPS: i32 = 8;

/// A derived recommendation for the next workout. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSuggestion {
    pub exercise_id: ExerciseId,
    pub weight_kg: f64,
    pub reps: i32,
    pub notes: String,
}

/// Service deriving next-workout suggestions. Pure state derivation over
/// the store; authorization happens upstream.
#[derive(Clone)]
pub struct PlanService {
    workouts: Arc<dyn WorkoutRepository>,
}

impl PlanService {
    pub fn new(workouts: Arc<dyn WorkoutRepository>) -> Self {
        Self { workouts }
    }

    /// Derive the next suggestion from the most recent set. Exactly one of
    /// the three progression rules applies; the session-type alternation
    /// note is appended independently.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn next_suggestion(&self, user_id: &UserId) -> Result<PlanSuggestion> {
        let last_set = match self.workouts.get_last_set(user_id).await? {
            Some(set) => set,
            None => {
                // No history: start with a default.
                return Ok(PlanSuggestion {
                    exercise_id: ExerciseId::new(),
                    weight_kg: DEFAULT_WEIGHT_KG,
                    reps: DEFAULT_REPS,
                    notes: "No history found; starting default weight and reps.".to_string(),
                });
            }
        };

        let mut suggestion = PlanSuggestion {
            exercise_id: last_set.exercise_id,
            weight_kg: last_set.weight_kg,
            reps: last_set.reps,
            notes: String::new(),
        };

        if last_set.reps >= UPPER_REP_RANGE {
            suggestion.weight_kg = last_set.weight_kg + WEIGHT_INCREMENT_KG;
            suggestion.notes = "Hit upper range; increase weight.".to_string();
        } else if last_set.reps <= LOWER_REP_RANGE {
            suggestion.reps = LOWER_REP_RANGE - 1;
            suggestion.notes = "Fell short; keep weight, reduce reps.".to_string();
        } else {
            suggestion.notes = "Maintain weight and rep target.".to_string();
        }

        // A failed last-session lookup is swallowed; the suggestion above
        // still stands, just without the alternation note.
        if let Ok(Some(last_session)) = self.workouts.get_last_session(user_id).await {
            match last_session.session_type.as_deref() {
                Some("upper") => suggestion.notes.push_str(" Next: switch to lower body."),
                Some("lower") => suggestion.notes.push_str(" Next: switch to upper body."),
                _ => {}
            }
        }

        Ok(suggestion)
    }
}
