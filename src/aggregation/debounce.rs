use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::debug;
use tokio::select;
use tokio_util::sync::CancellationToken;

/// Collapses bursts of triggers into one run after a quiet window.
///
/// Each trigger cancels the pending one. Runs never overlap: a run that
/// becomes due while another is executing waits for it, and is dropped if a
/// newer trigger arrives in the meantime. Must be used inside a tokio runtime.
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<CancellationToken>>,
    running: Arc<tokio::sync::Mutex<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
            running: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Schedules `job` after the quiet window, superseding any pending job.
    pub fn trigger<F, Fut>(&self, job: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.replace_pending(Some(token.clone())) {
            previous.cancel();
        }

        let window = self.window;
        let running = self.running.clone();
        tokio::spawn(async move {
            select! {
                _ = token.cancelled() => {
                    debug!("Debounced run superseded");
                    return;
                }
                _ = tokio::time::sleep(window) => {}
            }

            let _guard = running.lock().await;
            if token.is_cancelled() {
                debug!("Debounced run superseded while another was running");
                return;
            }
            job().await;
        });
    }

    /// Drops the pending run, if any. A run already executing is unaffected.
    pub fn cancel(&self) {
        if let Some(previous) = self.replace_pending(None) {
            previous.cancel();
        }
    }

    fn replace_pending(&self, token: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *pending, token)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WINDOW: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_trigger() {
        let debouncer = Debouncer::new(WINDOW);
        let runs = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));

        for value in 1..=5 {
            let (runs, last) = (runs.clone(), last.clone());
            debouncer.trigger(move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                last.store(value, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_runs_before_quiet_window() {
        let debouncer = Debouncer::new(WINDOW);
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        debouncer.trigger(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_each_run_once() {
        let debouncer = Debouncer::new(WINDOW);
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            for _ in 0..3 {
                let counter = runs.clone();
                debouncer.trigger(move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_never_overlap() {
        let debouncer = Debouncer::new(WINDOW);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let (active, peak, runs) = (active.clone(), peak.clone(), runs.clone());
            debouncer.trigger(move || async move {
                let now_active = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now_active, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(2)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(500)).await;
        }

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert!(runs.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_run() {
        let debouncer = Debouncer::new(WINDOW);
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        debouncer.trigger(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
