pub mod admin;
pub mod airports;
pub mod api;
pub mod chat;
pub mod dashboard;
pub mod flights;
pub mod listing;
pub mod status;
pub mod trip_plan;

pub use api::{ApiError, ApiResult, TravelApi};
pub use trip_plan::TripPlan;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Invalid {kind} selection.")]
    InvalidSelection { kind: &'static str, index: usize },
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
