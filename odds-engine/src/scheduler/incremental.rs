//! Incremental (league-by-league) scheduling loop, implemented with a signal
//! channel rather than a condition variable + dirty flag.

use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// One pass over the league list, fetching and upserting odds per league so
/// partial results are visible immediately.
#[async_trait::async_trait]
pub trait LeagueFetcher: Send + Sync {
    async fn leagues(&self) -> Vec<String>;
    async fn fetch_and_upsert(&self, league: &str);
}

pub struct IncrementalLoop<F: LeagueFetcher> {
    fetcher: F,
    trigger_rx: mpsc::Receiver<()>,
}

pub struct IncrementalHandle {
    trigger_tx: mpsc::Sender<()>,
}

impl IncrementalHandle {
    /// `TriggerNewCycle()` — posts to the channel the loop reads at cycle
    /// boundaries; dropped silently if the loop isn't currently waiting
    /// (matches "a signal, not a queue" semantics).
    pub async fn trigger_new_cycle(&self) {
        let _ = self.trigger_tx.try_send(());
    }
}

impl<F: LeagueFetcher> IncrementalLoop<F> {
    pub fn new(fetcher: F) -> (Self, IncrementalHandle) {
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        (Self { fetcher, trigger_rx }, IncrementalHandle { trigger_tx })
    }

    /// Runs cycles back-to-back (no pause between them) until cancelled.
    /// Each cycle terminates on all-leagues-processed, `cycle_timeout`
    /// elapsed, or cancellation.
    pub async fn run(&mut self, cancellation: CancellationToken, cycle_timeout: Duration) {
        loop {
            if cancellation.is_cancelled() {
                return;
            }
            self.run_one_cycle(&cancellation, cycle_timeout).await;
            // Drain any trigger that arrived mid-cycle; cycles already chain
            // continuously so this just avoids a stale pending trigger.
            while self.trigger_rx.try_recv().is_ok() {}
        }
    }

    async fn run_one_cycle(&mut self, cancellation: &CancellationToken, cycle_timeout: Duration) {
        let started = Instant::now();
        let leagues = self.fetcher.leagues().await;
        info!(leagues = leagues.len(), "starting incremental cycle");

        for league in leagues {
            if cancellation.is_cancelled() {
                return;
            }
            if started.elapsed() >= cycle_timeout {
                debug!("cycle timeout elapsed, ending cycle early");
                return;
            }

            tokio::select! {
                _ = self.fetcher.fetch_and_upsert(&league) => {}
                _ = cancellation.cancelled() => return,
            }
        }
    }
}
