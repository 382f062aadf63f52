use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::store::KeyValueStore;
use crate::errors::file_context;

/// File-backed store: one payload file and one timestamp file per key
pub struct FileStore {
    cache_dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimestampFile {
    updated_at: DateTime<Utc>,
}

impl FileStore {
    /// Create a new store, creating the directory if needed
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Remove every stored key
    pub fn clear(&self) -> Result<()> {
        fs::remove_dir_all(&self.cache_dir).context("Failed to clear cache")?;

        fs::create_dir_all(&self.cache_dir).context("Failed to recreate cache directory")?;

        info!("Cleared cache directory");
        Ok(())
    }

    // --- Helper Methods ---

    fn build_value_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.bin", key))
    }

    fn build_timestamp_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.meta.json", key))
    }

    /// Write to a sibling temp file, then rename over the target
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes).context("Failed to write cache temp file")?;
        fs::rename(&temp_path, path).context("Failed to move cache file into place")?;
        Ok(())
    }

    fn read_opt(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(path).with_context(|| file_context("read cache file", path))?;
        Ok(Some(bytes))
    }

    fn remove_if_exists(&self, path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path).with_context(|| file_context("remove cache file", path))?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.read_opt(&self.build_value_path(key))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.build_value_path(key);
        self.write_atomic(&path, value)?;
        debug!("Saved {} bytes to cache: {}", value.len(), path.display());
        Ok(())
    }

    fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let path = self.build_timestamp_path(key);
        let Some(bytes) = self.read_opt(&path)? else {
            return Ok(None);
        };

        let record: TimestampFile = serde_json::from_slice(&bytes)
            .with_context(|| file_context("parse timestamp file", &path))?;
        Ok(Some(record.updated_at))
    }

    fn set_timestamp(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        let json = serde_json::to_vec_pretty(&TimestampFile { updated_at: at })?;
        self.write_atomic(&self.build_timestamp_path(key), &json)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.remove_if_exists(&self.build_value_path(key))?;
        self.remove_if_exists(&self.build_timestamp_path(key))
    }
}
