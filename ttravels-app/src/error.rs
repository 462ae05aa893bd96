use ttravels_core::{ApiError, CoreError};
use ttravels_store::StoreError;

use crate::voice::VoiceError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Voice(#[from] VoiceError),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Text for alerts and inline error messages.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(e) => e.user_message(),
            AppError::Core(CoreError::ValidationError(msg)) => msg.clone(),
            AppError::Core(e) => e.to_string(),
            AppError::Voice(e) => e.to_string(),
            AppError::Store(e) => {
                tracing::error!("Local storage failure: {}", e);
                "Local storage is unavailable.".to_string()
            }
            AppError::Anyhow(e) => {
                tracing::error!("Unexpected failure: {}", e);
                "Something went wrong.".to_string()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
