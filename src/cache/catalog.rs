use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use super::store::KeyValueStore;
use crate::clock::Clock;
use crate::config::CacheSettings;
use crate::domain::{CachedCatalogSnapshot, EventRecord, is_within_expiry};
use crate::errors::cache_context;

/// What the store held when the catalog was looked up.
#[derive(Debug)]
pub enum SnapshotLookup {
    Fresh(CachedCatalogSnapshot),
    Stale,
    Absent,
    Corrupt,
}

impl fmt::Display for SnapshotLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotLookup::Fresh(snapshot) => write!(f, "fresh ({} events)", snapshot.events.len()),
            SnapshotLookup::Stale => f.write_str("stale"),
            SnapshotLookup::Absent => f.write_str("absent"),
            SnapshotLookup::Corrupt => f.write_str("corrupt"),
        }
    }
}

/// Serialized form of a snapshot, borrowing the events being written.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotPayload<'a> {
    events: &'a [EventRecord],
    captured_at: DateTime<Utc>,
}

/// TTL-bounded local copy of the full event catalog.
///
/// The snapshot and its capture time are stored as one value, and all access
/// goes through one lock, so a reader sees either the old or the new
/// snapshot in full. Stale, missing and unreadable snapshots all read as
/// `None`.
pub struct EventCatalogCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
    lock: RwLock<()>,
}

impl EventCatalogCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, settings: CacheSettings) -> Self {
        Self {
            store,
            clock,
            settings,
            lock: RwLock::new(()),
        }
    }

    fn key(&self) -> &str {
        self.settings.catalog_key
    }

    pub fn lookup(&self) -> SnapshotLookup {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);

        let bytes = match self.store.get(self.key()) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return SnapshotLookup::Absent,
            Err(e) => {
                warn!("Failed to read catalog cache: {:?}", e);
                return SnapshotLookup::Corrupt;
            }
        };

        let snapshot: CachedCatalogSnapshot = match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Discarding unreadable catalog cache ({} bytes): {}", bytes.len(), e);
                return SnapshotLookup::Corrupt;
            }
        };

        if !snapshot.is_fresh_at(self.clock.now(), self.settings.expiry) {
            debug!("Catalog cache captured at {} has expired", snapshot.captured_at);
            return SnapshotLookup::Stale;
        }

        SnapshotLookup::Fresh(snapshot)
    }

    /// Cached events in stored order, or `None` on any kind of miss.
    pub fn read(&self) -> Option<Vec<EventRecord>> {
        match self.lookup() {
            SnapshotLookup::Fresh(snapshot) => {
                info!("Loaded {} events from catalog cache", snapshot.events.len());
                Some(snapshot.events)
            }
            miss => {
                info!("Catalog cache miss: {}", miss);
                None
            }
        }
    }

    /// Replaces the snapshot, stamped with the current time.
    pub fn write(&self, events: &[EventRecord]) -> Result<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);

        let captured_at = self.clock.now();
        let payload = SnapshotPayload { events, captured_at };
        let bytes = serde_json::to_vec(&payload).context("Failed to serialize catalog snapshot")?;

        self.store
            .set(self.key(), &bytes)
            .with_context(|| cache_context("write", self.key()))?;
        self.store
            .set_timestamp(self.key(), captured_at)
            .with_context(|| format!("Failed to stamp catalog cache at {}", captured_at))?;

        info!("Saved {} events to catalog cache", events.len());
        Ok(())
    }

    /// Staleness check from the timestamp alone, without decoding the events.
    pub fn is_fresh(&self) -> bool {
        self.captured_at()
            .is_some_and(|captured_at| is_within_expiry(captured_at, self.clock.now(), self.settings.expiry))
    }

    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        match self.store.get_timestamp(self.key()) {
            Ok(captured_at) => captured_at,
            Err(e) => {
                warn!("Failed to read catalog cache timestamp: {:?}", e);
                None
            }
        }
    }

    /// Forces the next read to miss.
    pub fn invalidate(&self) -> Result<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        self.store
            .remove(self.key())
            .with_context(|| cache_context("invalidate", self.key()))?;
        info!("Invalidated catalog cache");
        Ok(())
    }
}
