use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use log::info;
use tokio::sync::watch;

use super::debounce::Debouncer;
use super::series::{SeriesFacet, recompute_available_series};
use crate::domain::{EventCollection, EventRecord};

/// Keeps the series facet in step with a catalog that changes in bursts.
///
/// Catalog changes are debounced; subscribers see one new facet per burst.
pub struct SeriesFacetTracker {
    debouncer: Debouncer,
    state: Arc<TrackerState>,
}

struct TrackerState {
    selected: Mutex<BTreeSet<String>>,
    sender: watch::Sender<SeriesFacet>,
}

impl TrackerState {
    fn publish(&self, catalog: &[EventRecord]) -> SeriesFacet {
        let mut selected = self.selected.lock().unwrap_or_else(PoisonError::into_inner);
        let facet = recompute_available_series(catalog, &selected);
        *selected = facet.selected.clone();

        info!(
            "Recomputed series facet: {} series over {} events, {} selected",
            facet.series.len(),
            catalog.len(),
            facet.selected.len()
        );
        self.sender.send_replace(facet.clone());
        facet
    }
}

impl SeriesFacetTracker {
    pub fn new(window: Duration) -> Self {
        let (sender, _) = watch::channel(SeriesFacet::default());
        Self {
            debouncer: Debouncer::new(window),
            state: Arc::new(TrackerState {
                selected: Mutex::new(BTreeSet::new()),
                sender,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SeriesFacet> {
        self.state.sender.subscribe()
    }

    pub fn current(&self) -> SeriesFacet {
        self.state.sender.borrow().clone()
    }

    /// Replaces the selection; it is pruned on the next recompute.
    pub fn select<I, S>(&self, series: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected = self.state.selected.lock().unwrap_or_else(PoisonError::into_inner);
        *selected = series.into_iter().map(Into::into).collect();
    }

    /// Schedules a debounced recompute over a catalog that is still being
    /// built. The catalog is only read when the run fires.
    pub fn catalog_changed(&self, catalog: &Arc<RwLock<EventCollection>>) {
        let state = self.state.clone();
        let catalog = catalog.clone();
        self.debouncer.trigger(move || async move {
            let collection = catalog.read().unwrap_or_else(PoisonError::into_inner);
            state.publish(collection.as_slice());
        });
    }

    /// Recomputes immediately, dropping any pending debounced run.
    pub fn recompute_now(&self, catalog: &[EventRecord]) -> SeriesFacet {
        self.debouncer.cancel();
        self.state.publish(catalog)
    }
}
