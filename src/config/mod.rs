pub mod settings;

pub use settings::{
    AggregationSettings, AppConfig, CacheBackend, CacheSettings, FetchSettings, TimingSettings,
};
