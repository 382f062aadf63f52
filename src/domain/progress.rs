use log::info;

/// Running totals for a multi-batch catalog fetch.
#[derive(Debug, Default)]
pub struct SyncProgress {
    batches: usize,
    received: usize,
    added: usize,
}

impl SyncProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_batch(&mut self, received: usize, added: usize) {
        self.batches += 1;
        self.received += received;
        self.added += added;
        info!(
            "  → Batch {}: {} events ({} new, {} total)",
            self.batches, received, added, self.added
        );
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn duplicates(&self) -> usize {
        self.received - self.added
    }

    pub fn unique_events(&self) -> usize {
        self.added
    }
}
