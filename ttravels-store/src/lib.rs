//! Backend access and local persistence for the TTravels pages.

pub mod app_config;
pub mod http_client;
pub mod local_store;

pub use app_config::AppConfig;
pub use http_client::ApiClient;
pub use local_store::{FileStore, KeyValueStore, MemoryStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored data is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("HTTP client setup failed: {0}")]
    Http(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
