//! Scheduler — drives the registered adapters: one initial
//! pass, then periodic fire-and-forget ticks, each single-flight per adapter
//! and bounded by `async_parsing_timeout`.

pub mod incremental;

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::adapters::Adapter;
use crate::registry::AdapterRegistry;

pub struct SchedulerConfig {
    pub interval: Duration,
    pub async_parsing_timeout: Duration,
}

pub struct Scheduler {
    registry: Arc<AdapterRegistry>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(registry: Arc<AdapterRegistry>, config: SchedulerConfig) -> Self {
        Self { registry, config }
    }

    /// Runs until `cancellation` fires: an initial pass over every active
    /// adapter, then periodic ticks. Every tick's spawned runs are tracked in
    /// `in_flight`, so cancellation can actually wait for them to settle
    /// instead of just dropping them.
    pub async fn run(&self, cancellation: CancellationToken) {
        let mut initial = JoinSet::new();
        for adapter in self.registry.active() {
            let adapter = adapter.clone();
            let timeout = self.config.async_parsing_timeout;
            initial.spawn(async move { run_with_timeout(adapter, timeout).await });
        }
        while initial.join_next().await.is_some() {}

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut in_flight: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                _ = cancellation.cancelled() => {
                    info!(in_flight = in_flight.len(), "scheduler cancellation received, waiting for in-flight runs to settle");
                    self.drain(&mut in_flight).await;
                    break;
                }
                _ = ticker.tick() => {
                    // Reap finished handles so `in_flight` doesn't grow
                    // unbounded across ticks; nothing to do with the result,
                    // `run_with_timeout` already logged it.
                    while in_flight.try_join_next().is_some() {}
                    for adapter in self.registry.active() {
                        let adapter = adapter.clone();
                        let timeout = self.config.async_parsing_timeout;
                        in_flight.spawn(async move { run_with_timeout(adapter, timeout).await });
                    }
                }
            }
        }
    }

    /// Waits for every tracked task to finish, bounded by
    /// `async_parsing_timeout` — each task already enforces that timeout on
    /// its own adapter call, so this bound only guards against a task that's
    /// wedged outside the adapter call itself (e.g. stuck on the runtime).
    async fn drain(&self, in_flight: &mut JoinSet<()>) {
        let deadline = self.config.async_parsing_timeout;
        match tokio::time::timeout(deadline, async {
            while in_flight.join_next().await.is_some() {}
        })
        .await
        {
            Ok(()) => info!("all in-flight runs settled"),
            Err(_) => error!(remaining = in_flight.len(), "timed out waiting for in-flight runs, shutting down anyway"),
        }
    }
}

/// Fire-and-forget task body: failures are reported to the logger, never
/// propagated — the scheduler never lets one adapter's failure interrupt the others.
async fn run_with_timeout(adapter: Arc<dyn Adapter>, timeout: Duration) {
    match tokio::time::timeout(timeout, adapter.parse_once()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(adapter = adapter.name(), error = %e, "parse cycle failed"),
        Err(_) => error!(adapter = adapter.name(), "parse cycle timed out"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterError;
    use crate::registry::AdapterRegistryBuilder;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingAdapter {
        name: &'static str,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl Adapter for CountingAdapter {
        fn name(&self) -> &str {
            self.name
        }

        async fn start(&self, cancellation: CancellationToken) -> Result<(), AdapterError> {
            cancellation.cancelled().await;
            Ok(())
        }

        async fn parse_once(&self) -> Result<(), AdapterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct SlowAdapter {
        name: &'static str,
        delay: Duration,
        completed: Arc<AtomicU32>,
    }

    #[async_trait]
    impl Adapter for SlowAdapter {
        fn name(&self) -> &str {
            self.name
        }

        async fn start(&self, cancellation: CancellationToken) -> Result<(), AdapterError> {
            cancellation.cancelled().await;
            Ok(())
        }

        async fn parse_once(&self) -> Result<(), AdapterError> {
            tokio::time::sleep(self.delay).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn cancellation_waits_for_in_flight_tick_before_returning() {
        let completed = Arc::new(AtomicU32::new(0));
        let mut builder = AdapterRegistryBuilder::new();
        builder.register("slow", Arc::new(SlowAdapter { name: "slow", delay: Duration::from_millis(60), completed: completed.clone() })).unwrap();
        let registry = Arc::new(builder.build(&[]).unwrap());

        // Initial pass completes at ~60ms (completed=1). First tick fires at
        // ~80ms and starts a run that finishes at ~140ms. Cancellation fires
        // at 90ms, while that tick's run is still in flight: `run()` must
        // not return until it settles at ~140ms (completed=2).
        let scheduler = Scheduler::new(registry, SchedulerConfig { interval: Duration::from_millis(20), async_parsing_timeout: Duration::from_secs(5) });

        let cancellation = CancellationToken::new();
        let trigger = cancellation.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(90)).await;
            trigger.cancel();
        });

        scheduler.run(cancellation).await;

        assert_eq!(completed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn initial_pass_runs_every_active_adapter_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut builder = AdapterRegistryBuilder::new();
        builder.register("stub", Arc::new(CountingAdapter { name: "stub", calls: calls.clone() })).unwrap();
        let registry = Arc::new(builder.build(&[]).unwrap());

        let scheduler = Scheduler::new(registry, SchedulerConfig { interval: Duration::from_secs(3600), async_parsing_timeout: Duration::from_secs(5) });

        let cancellation = CancellationToken::new();
        cancellation.cancel();
        scheduler.run(cancellation).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
