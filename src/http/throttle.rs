use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Enforces a minimum gap between consecutive requests.
pub struct Throttle {
    min_interval: Duration,
    last_request: Option<Instant>,
    request_count: usize,
}

impl Throttle {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(min_interval_ms),
            last_request: None,
            request_count: 0,
        }
    }

    /// Waits until the interval since the previous request has elapsed.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            sleep_until(last + self.min_interval).await;
        }
        self.last_request = Some(Instant::now());
        self.request_count += 1;
    }

    pub fn request_count(&self) -> usize {
        self.request_count
    }
}
