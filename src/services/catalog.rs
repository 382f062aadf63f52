use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::sync::watch;

use crate::aggregation::{SeriesFacet, SeriesFacetTracker};
use crate::api::CatalogSource;
use crate::cache::{EventCatalogCache, FileStore, KeyValueStore};
use crate::clock::Clock;
use crate::config::{AppConfig, CacheBackend, CacheSettings};
use crate::database::SqliteStore;
use crate::domain::{EventCollection, EventRecord, SyncProgress};

/// Where a loaded catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    Cache,
    Fetched { batches: usize, duplicates: usize },
}

#[derive(Debug)]
pub struct CatalogLoad {
    pub events: Vec<EventRecord>,
    pub origin: CatalogOrigin,
    pub facet: SeriesFacet,
}

/// Opens the persistence backend named in the cache settings
pub fn open_store(settings: &CacheSettings) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match settings.backend {
        CacheBackend::File => Arc::new(FileStore::new(&settings.cache_dir)?),
        CacheBackend::Sqlite => Arc::new(
            SqliteStore::open(&settings.db_path)
                .with_context(|| format!("Failed to open cache database {}", settings.db_path.display()))?,
        ),
    };
    Ok(store)
}

/// Serves the catalog from cache, falling back to a full fetch.
pub struct CatalogService {
    cache: EventCatalogCache,
    tracker: SeriesFacetTracker,
}

impl CatalogService {
    pub fn new(cache: EventCatalogCache, tracker: SeriesFacetTracker) -> Self {
        Self { cache, tracker }
    }

    pub fn from_config(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = open_store(&config.cache)?;
        let cache = EventCatalogCache::new(store, clock, config.cache.clone());
        let tracker = SeriesFacetTracker::new(config.aggregation.series_debounce);
        Ok(Self::new(cache, tracker))
    }

    pub fn cache(&self) -> &EventCatalogCache {
        &self.cache
    }

    pub fn facets(&self) -> watch::Receiver<SeriesFacet> {
        self.tracker.subscribe()
    }

    /// Returns the cached catalog when fresh, otherwise fetches and caches it.
    /// `force` skips the cache lookup.
    pub async fn load<S: CatalogSource>(&self, source: &mut S, force: bool) -> Result<CatalogLoad> {
        if force {
            info!("Forced refresh, bypassing catalog cache");
        } else if let Some(events) = self.cache.read() {
            let facet = self.tracker.recompute_now(&events);
            return Ok(CatalogLoad {
                events,
                origin: CatalogOrigin::Cache,
                facet,
            });
        }

        self.sync(source).await
    }

    /// Fetches every batch, de-duplicating by id, and stores the result.
    pub async fn sync<S: CatalogSource>(&self, source: &mut S) -> Result<CatalogLoad> {
        info!("=== Starting Catalog Sync ===");

        let collection = Arc::new(RwLock::new(EventCollection::new()));
        let mut progress = SyncProgress::new();

        while let Some(batch) = source.next_batch().await? {
            let received = batch.len();
            let added = collection.write().unwrap_or_else(PoisonError::into_inner).extend(batch);
            progress.record_batch(received, added);
            self.tracker.catalog_changed(&collection);
        }

        let facet = self
            .tracker
            .recompute_now(collection.read().unwrap_or_else(PoisonError::into_inner).as_slice());
        let events = match Arc::try_unwrap(collection) {
            Ok(lock) => lock.into_inner().unwrap_or_else(PoisonError::into_inner).into_vec(),
            // A superseded debounced run may still hold a handle.
            Err(shared) => shared.read().unwrap_or_else(PoisonError::into_inner).as_slice().to_vec(),
        };

        if let Err(e) = self.cache.write(&events) {
            warn!("Failed to save catalog to cache: {:?}", e);
        }

        info!(
            "=== Catalog Sync Complete: {} events in {} batches ({} duplicates) ===",
            events.len(),
            progress.batches(),
            progress.duplicates()
        );

        Ok(CatalogLoad {
            events,
            origin: CatalogOrigin::Fetched {
                batches: progress.batches(),
                duplicates: progress.duplicates(),
            },
            facet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StaticSource;
    use crate::cache::MemoryStore;
    use crate::clock::ManualClock;
    use crate::domain::CalendarDate;
    use anyhow::bail;
    use chrono::{Duration, Utc};
    use std::time::Duration as StdDuration;

    fn record(id: &str, series: &str) -> EventRecord {
        EventRecord::new(id, format!("Event {id}"), CalendarDate::new(2024, 6, 1)).with_series(series)
    }

    fn service() -> (CatalogService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = EventCatalogCache::new(Arc::new(MemoryStore::new()), clock.clone(), CacheSettings::default());
        let tracker = SeriesFacetTracker::new(StdDuration::from_millis(300));
        (CatalogService::new(cache, tracker), clock)
    }

    struct FailingSource;

    impl CatalogSource for FailingSource {
        async fn next_batch(&mut self) -> Result<Option<Vec<EventRecord>>> {
            bail!("connection refused")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_dedupes_and_caches() {
        let (service, _) = service();
        let mut facets = service.facets();
        let mut source = StaticSource::new([
            vec![record("a", "WSOP"), record("b", "EPT")],
            vec![record("b", "EPT"), record("c", "WSOP")],
        ]);

        let load = service.load(&mut source, false).await.unwrap();
        assert_eq!(load.events.len(), 3);
        assert_eq!(
            load.origin,
            CatalogOrigin::Fetched {
                batches: 2,
                duplicates: 1
            }
        );
        assert_eq!(load.facet.names().collect::<Vec<_>>(), vec!["WSOP", "EPT"]);
        assert_eq!(*facets.borrow_and_update(), load.facet);
        assert_eq!(service.cache().read().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_cache_skips_fetch() {
        let (service, _) = service();
        service.cache().write(&[record("cached", "WPT")]).unwrap();

        let load = service.load(&mut FailingSource, false).await.unwrap();
        assert_eq!(load.origin, CatalogOrigin::Cache);
        assert_eq!(load.events[0].id, "cached");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_cache_and_force_refetch() {
        let (service, clock) = service();
        service.cache().write(&[record("old", "WPT")]).unwrap();

        let mut source = StaticSource::new([vec![record("new", "WPT")]]);
        let load = service.load(&mut source, true).await.unwrap();
        assert_eq!(load.events[0].id, "new");

        clock.advance(Duration::hours(7));
        let mut source = StaticSource::new([vec![record("newer", "WPT")]]);
        let load = service.load(&mut source, false).await.unwrap();
        assert_eq!(load.events[0].id, "newer");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_is_surfaced() {
        let (service, _) = service();

        let error = service.load(&mut FailingSource, false).await.unwrap_err();
        assert!(error.to_string().contains("connection refused"));
        assert!(service.cache().read().is_none());
    }
}
