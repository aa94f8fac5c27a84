//! Repository traits and their SQLx implementations.

pub mod user;
pub mod workout;

pub use user::{SqlxUserRepository, UserRepository};
pub use workout::{SqlxWorkoutRepository, WorkoutRepository};
