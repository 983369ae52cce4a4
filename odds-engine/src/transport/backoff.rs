//! Linear backoff for listing fetches: up to 3 attempts with linear
//! 2-second pauses on transport error or non-200.

use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::error::TransportError;

const MAX_ATTEMPTS: u32 = 3;
const PAUSE: Duration = Duration::from_secs(2);

/// Retry `attempt` up to `MAX_ATTEMPTS` times, sleeping `n * PAUSE` between
/// tries (linear, not exponential, per the contract above).
pub async fn with_linear_backoff<T, F, Fut>(label: &str, mut attempt: F) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, TransportError>>,
{
    let mut last_err = None;
    for n in 1..=MAX_ATTEMPTS {
        match attempt().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                warn!(adapter = label, attempt = n, error = %e, "fetch attempt failed");
                last_err = Some(e);
                if n < MAX_ATTEMPTS {
                    sleep(PAUSE * n).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or(TransportError::Request("exhausted retries".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_linear_backoff("test", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(TransportError::Request("transient".into()))
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let result: Result<(), TransportError> =
            with_linear_backoff("test", || async { Err(TransportError::Request("always".into())) }).await;
        assert!(result.is_err());
    }
}
