//! Page controllers for the TTravels client and the seams they drive.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use ttravels_core::TravelApi;
use ttravels_store::{AppConfig, KeyValueStore};

pub mod controllers;
pub mod debounce;
pub mod error;
#[cfg(test)]
mod testing;
pub mod ui;
pub mod voice;

pub use error::{AppError, AppResult};
pub use ui::{RecordingUi, Slot, TerminalUi, ToastKind, Ui};

/// What every page controller shares: the backend, local storage and settings.
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn TravelApi>,
    pub store: Arc<dyn KeyValueStore>,
    pub config: AppConfig,
    /// Reference date for relative filters and default search dates.
    pub today: NaiveDate,
}

impl AppContext {
    pub fn new(api: Arc<dyn TravelApi>, store: Arc<dyn KeyValueStore>, config: AppConfig) -> Self {
        Self {
            api,
            store,
            config,
            today: Utc::now().date_naive(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}
