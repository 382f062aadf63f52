use std::path::PathBuf;

use chrono::{Duration, NaiveTime};

/// Start time assumed when an event's start text is missing or unreadable ("prime time").
pub const DEFAULT_START_HOUR: u32 = 18;
/// Late registration length assumed when the text carries no usable cue.
pub const LATE_REGISTRATION_FALLBACK_HOURS: i64 = 2;
/// Level length assumed for "Level N" cues when the record has none.
pub const DEFAULT_LEVEL_LENGTH_MINUTES: u32 = 20;
/// Typical tournament duration after late registration closes (or after start).
pub const ONGOING_WINDOW_HOURS: i64 = 12;
/// A cached catalog older than this is treated as absent.
pub const CACHE_EXPIRY_HOURS: i64 = 6;
/// Quiet window for collapsing bursts of catalog changes.
pub const SERIES_DEBOUNCE_MS: u64 = 300;
/// Group label for events without a series.
pub const OTHER_EVENTS_LABEL: &str = "Other Events";

#[derive(Debug, Clone)]
pub struct TimingSettings {
    pub default_start: NaiveTime,
    pub late_registration_fallback: Duration,
    pub default_level_length_minutes: u32,
    pub ongoing_window: Duration,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            default_start: NaiveTime::from_hms_opt(DEFAULT_START_HOUR, 0, 0).unwrap_or_default(),
            late_registration_fallback: Duration::hours(LATE_REGISTRATION_FALLBACK_HOURS),
            default_level_length_minutes: DEFAULT_LEVEL_LENGTH_MINUTES,
            ongoing_window: Duration::hours(ONGOING_WINDOW_HOURS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    File,
    Sqlite,
}

impl CacheBackend {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "file" => Some(CacheBackend::File),
            "sqlite" => Some(CacheBackend::Sqlite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub expiry: Duration,
    pub catalog_key: &'static str,
    pub backend: CacheBackend,
    pub cache_dir: PathBuf,
    pub db_path: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            expiry: Duration::hours(CACHE_EXPIRY_HOURS),
            catalog_key: "event_catalog",
            backend: CacheBackend::File,
            cache_dir: PathBuf::from("cache"),
            db_path: PathBuf::from("event_cache.db"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregationSettings {
    pub series_debounce: std::time::Duration,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            series_debounce: std::time::Duration::from_millis(SERIES_DEBOUNCE_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub min_request_interval_ms: u64,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub base_url: String,
    pub max_pages: Option<usize>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            min_request_interval_ms: 250,
            user_agent: "PokerEventEngine/1.0",
            timeout_secs: 30,
            base_url: "http://localhost:8080/api".to_string(),
            max_pages: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub timing: TimingSettings,
    pub cache: CacheSettings,
    pub aggregation: AggregationSettings,
    pub fetch: FetchSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `EVENT_CATALOG_URL`, `EVENT_CACHE_DIR`,
    /// `EVENT_CACHE_BACKEND` and `EVENT_CACHE_DB_PATH`.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(url) = std::env::var("EVENT_CATALOG_URL") {
            config.fetch.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(dir) = std::env::var("EVENT_CACHE_DIR") {
            config.cache.cache_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("EVENT_CACHE_DB_PATH") {
            config.cache.db_path = PathBuf::from(path);
        }
        if let Ok(name) = std::env::var("EVENT_CACHE_BACKEND") {
            match CacheBackend::from_name(&name) {
                Some(backend) => config.cache.backend = backend,
                None => log::warn!("Unknown cache backend '{}', keeping {:?}", name, config.cache.backend),
            }
        }

        config
    }
}
