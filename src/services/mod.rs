//! Business services built on the repositories.

pub mod plan_service;
pub mod session_service;

pub use plan_service::{PlanService, PlanSuggestion};
pub use session_service::{AddSetRequest, CreateSessionRequest, SessionService};
