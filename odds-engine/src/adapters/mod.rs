//! Vendor adapter contract.
//!
//! Deep inheritance between adapters is replaced here by this trait plus a
//! composition of reusable collaborators (transport client, mirror
//! resolver, code-table mapper, match builder); each adapter is a struct
//! holding configuration and references to those collaborators, not a
//! subclass of a base adapter type.

pub mod fonbet;
pub mod generic;
pub mod leon;
pub mod olimp;
pub mod onexbet;
pub mod pinnacle;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AdapterError;

#[async_trait]
pub trait Adapter: Send + Sync {
    fn name(&self) -> &str;

    async fn start(&self, cancellation: CancellationToken) -> Result<(), AdapterError>;

    async fn stop(&self) -> Result<(), AdapterError> {
        Ok(())
    }

    /// One complete ingestion pass. Callers must route this through
    /// `SingleFlight::run` rather than calling it directly — see below.
    async fn parse_once(&self) -> Result<(), AdapterError>;
}

#[async_trait]
pub trait IncrementalAdapter: Adapter {
    async fn start_incremental(&self, cancellation: CancellationToken, cycle_timeout: std::time::Duration) -> Result<(), AdapterError>;

    async fn trigger_new_cycle(&self) -> Result<(), AdapterError>;
}

/// Serializes `ParseOnce` invocations per adapter: overlapping invocations
/// serialize on an adapter-local mutex. A tick that fires while the
/// previous run is still executing does not spawn a second concurrent run;
/// it logs and skips.
#[derive(Default)]
pub struct SingleFlight {
    lock: Mutex<()>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` only if no other run is currently in flight. Returns `Ok(None)`
    /// (and logs) when skipped rather than blocking the caller.
    pub async fn run<F, Fut, T>(&self, adapter_name: &str, f: F) -> Option<Result<T, AdapterError>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, AdapterError>>,
    {
        let guard = match self.lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                info!(adapter = adapter_name, "parse cycle already in flight, skipping tick");
                return None;
            }
        };
        let result = f().await;
        drop(guard);
        Some(result)
    }
}

/// Filter step shared by every adapter's pipeline.
pub fn passes_match_filter(home_team: &str, away_team: &str, event_name: &str, start_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    if is_placeholder_team_name(home_team) || is_placeholder_team_name(away_team) {
        return false;
    }
    if home_team.eq_ignore_ascii_case(away_team) {
        return false;
    }
    if !event_name.is_empty() && event_name.chars().count() < 5 {
        return false;
    }
    if start_time <= now {
        return false;
    }
    true
}

fn is_placeholder_team_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.chars().count() < 2 {
        return true;
    }
    const GENERIC: &[&str] = &["vs", "home", "away", "tbd", "хозяева", "гости"];
    GENERIC.contains(&trimmed.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, hour, 0, 0).unwrap()
    }

    #[test]
    fn rejects_placeholder_team_names() {
        assert!(!passes_match_filter("TBD", "Real Madrid", "Match", ts(18), ts(12)));
        assert!(!passes_match_filter("A", "Real Madrid", "Match", ts(18), ts(12)));
        assert!(!passes_match_filter("vs", "Real Madrid", "Match", ts(18), ts(12)));
    }

    #[test]
    fn rejects_identical_team_names() {
        assert!(!passes_match_filter("Real Madrid", "real madrid", "Match", ts(18), ts(12)));
    }

    #[test]
    fn rejects_short_event_names() {
        assert!(!passes_match_filter("A FC", "B FC", "Abc", ts(18), ts(12)));
    }

    #[test]
    fn rejects_live_matches() {
        assert!(!passes_match_filter("A FC", "B FC", "", ts(10), ts(12)));
        assert!(!passes_match_filter("A FC", "B FC", "", ts(12), ts(12)));
    }

    #[test]
    fn accepts_well_formed_upcoming_match() {
        assert!(passes_match_filter("Bayern Munich", "Real Madrid", "", ts(18), ts(12)));
    }

    #[tokio::test]
    async fn single_flight_skips_overlapping_runs() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let flight = Arc::new(SingleFlight::new());
        let counter = Arc::new(AtomicU32::new(0));

        let f1 = flight.clone();
        let c1 = counter.clone();
        let run1 = tokio::spawn(async move {
            f1.run("test", || async move {
                c1.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                Ok::<_, AdapterError>(())
            })
            .await
        });

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let skipped = flight.run("test", || async { Ok::<_, AdapterError>(()) }).await;
        assert!(skipped.is_none());

        run1.await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
