//! Core domain types shared across the crate.

pub mod id;
pub mod workout;

pub use id::{ExerciseId, SessionId, SetId, UserId};
pub use workout::{NewTrainingSession, NewWorkoutSet, TrainingSession, WorkoutSet};
