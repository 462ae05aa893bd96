use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".into()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_storage_path() }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".ttravels/local_storage.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    /// Recording is cut off after this many seconds.
    #[serde(default = "default_voice_max")]
    pub voice_max_seconds: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { voice_max_seconds: default_voice_max() }
    }
}

fn default_voice_max() -> u64 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

fn default_debounce() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_autocomplete_limit")]
    pub autocomplete_limit: usize,
    #[serde(default = "default_autocomplete_min")]
    pub autocomplete_min_chars: usize,
    #[serde(default = "default_price_max")]
    pub default_price_max: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            autocomplete_limit: default_autocomplete_limit(),
            autocomplete_min_chars: default_autocomplete_min(),
            default_price_max: default_price_max(),
        }
    }
}

fn default_autocomplete_limit() -> usize {
    8
}

fn default_autocomplete_min() -> usize {
    2
}

fn default_price_max() -> f64 {
    100_000.0
}

impl AppConfig {
    /// Loads `config/default`, then `config/{RUN_MODE}` and `config/local` if
    /// present, then `TTRAVELS__*` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let layer = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&layer("default")))
            .add_source(config::File::with_name(&layer(&run_mode)).required(false))
            .add_source(config::File::with_name(&layer("local")).required(false))
            .add_source(config::Environment::with_prefix("TTRAVELS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
