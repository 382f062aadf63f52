use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};

use super::connection::{DbPool, create_pool, get_connection};
use super::setup::ensure_schema;
use crate::cache::KeyValueStore;

/// SQLite-backed key-value store for the catalog cache.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn open(database_path: &Path) -> Result<Self> {
        let pool = create_pool(database_path)?;
        let mut conn = get_connection(&pool)?;
        ensure_schema(&mut conn)?;

        log::info!("Opened cache database at {}", database_path.display());
        Ok(Self { pool })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = get_connection(&self.pool)?;
        conn.query_row(
            "SELECT value FROM cache_entries WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .context("Failed to query cache entry")
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT INTO cache_entries (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .context("Failed to upsert cache entry")?;
        Ok(())
    }

    fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let conn = get_connection(&self.pool)?;
        conn.query_row(
            "SELECT captured_at FROM cache_metadata WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .context("Failed to query cache timestamp")
    }

    fn set_timestamp(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT INTO cache_metadata (key, captured_at) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET captured_at = excluded.captured_at",
            params![key, at],
        )
        .context("Failed to upsert cache timestamp")?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to start cache transaction")?;
        tx.execute("DELETE FROM cache_entries WHERE key = ?1", params![key])?;
        tx.execute("DELETE FROM cache_metadata WHERE key = ?1", params![key])?;
        tx.commit().context("Failed to remove cache entry")
    }
}
