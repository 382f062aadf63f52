use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};

/// Local key-value persistence used by the catalog cache.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>>;

    fn set_timestamp(&self, key: &str, at: DateTime<Utc>) -> Result<()>;

    /// Drops the value and its timestamp; missing keys are not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local store; does not survive restarts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Vec<u8>>>,
    timestamps: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(what: &str) -> anyhow::Error {
    anyhow!("Memory store {} lock poisoned", what)
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let values = self.values.read().map_err(|_| poisoned("value"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned("value"))?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let timestamps = self.timestamps.read().map_err(|_| poisoned("timestamp"))?;
        Ok(timestamps.get(key).copied())
    }

    fn set_timestamp(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        let mut timestamps = self.timestamps.write().map_err(|_| poisoned("timestamp"))?;
        timestamps.insert(key.to_string(), at);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.write().map_err(|_| poisoned("value"))?.remove(key);
        self.timestamps.write().map_err(|_| poisoned("timestamp"))?.remove(key);
        Ok(())
    }
}
