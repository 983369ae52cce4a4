//! Mirror resolution with TTL cache and health probe.

use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};
use url::Url;

use crate::error::MirrorError;
use crate::headless::HeadlessResolver;

struct Cached {
    base_url: String,
    resolved_at: Instant,
}

/// One resolver per adapter. `ensureResolved` is the hot path; `resolve_mirror`
/// is the slow path invoked on cache miss/stale/failure, serialized by `lock`
/// so concurrent callers reuse one outcome instead of herding the mirror.
pub struct MirrorResolver {
    client: Client,
    mirror_url: String,
    fallback_base_url: Option<String>,
    ttl: Duration,
    timeout: Duration,
    cache: Mutex<Option<Cached>>,
    resolve_lock: Arc<Mutex<()>>,
    headless: Arc<dyn HeadlessResolver>,
}

impl MirrorResolver {
    pub fn new(mirror_url: String, fallback_base_url: Option<String>, ttl: Duration, timeout: Duration, headless: Arc<dyn HeadlessResolver>) -> Self {
        Self {
            client: Client::builder().build().unwrap_or_default(),
            mirror_url,
            fallback_base_url,
            ttl,
            timeout,
            cache: Mutex::new(None),
            resolve_lock: Arc::new(Mutex::new(())),
            headless,
        }
    }

    pub async fn ensure_resolved(&self) -> Result<String, MirrorError> {
        {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.as_ref() {
                if cached.resolved_at.elapsed() < self.ttl && self.health_probe(&cached.base_url).await {
                    return Ok(cached.base_url.clone());
                }
            }
        }
        self.resolve_mirror().await
    }

    async fn health_probe(&self, base_url: &str) -> bool {
        match self.client.head(base_url).timeout(self.timeout).send().await {
            Ok(resp) => !matches!(resp.status().as_u16(), 502 | 503 | 400..=499 | 500..=599),
            Err(e) => {
                warn!(base_url, error = %e, "mirror health probe failed, requiring re-resolution");
                false
            }
        }
    }

    /// The slow path. Serialized: a second caller arriving while a resolve is
    /// in flight waits on the same lock and then reads the cache the first
    /// caller just populated, rather than re-resolving.
    async fn resolve_mirror(&self) -> Result<String, MirrorError> {
        let _guard = self.resolve_lock.lock().await;

        if let Some(cached) = self.cache.lock().await.as_ref() {
            if cached.resolved_at.elapsed() < self.ttl {
                return Ok(cached.base_url.clone());
            }
        }

        let resolved = self.resolve_via_http().await;
        let resolved = match resolved {
            Ok(url) => Ok(url),
            Err(_) => self.headless.resolve(&self.mirror_url).await,
        };

        let base_url = match resolved {
            Ok(url) => url,
            Err(e) => match self.fallback_base_url.clone().or_else(|| self.cached_value_sync()) {
                Some(fallback) => {
                    warn!(mirror = %self.mirror_url, error = %e, "mirror resolution failed, using fallback");
                    fallback
                }
                None => return Err(e),
            },
        };

        info!(mirror = %self.mirror_url, resolved = %base_url, "mirror resolved");
        *self.cache.lock().await = Some(Cached { base_url: base_url.clone(), resolved_at: Instant::now() });
        Ok(base_url)
    }

    fn cached_value_sync(&self) -> Option<String> {
        self.cache.try_lock().ok().and_then(|c| c.as_ref().map(|c| c.base_url.clone()))
    }

    async fn resolve_via_http(&self) -> Result<String, MirrorError> {
        let response = self
            .client
            .get(&self.mirror_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| crate::error::TransportError::Request(e.to_string()))?;

        let final_url = response.url().to_string();

        if final_url == self.mirror_url || points_to_bare_ip(&final_url) {
            return Err(MirrorError::Unresolved);
        }

        Ok(final_url)
    }
}

fn points_to_bare_ip(url: &str) -> bool {
    Url::parse(url).ok().and_then(|u| u.host_str().map(|h| h.parse::<std::net::IpAddr>().is_ok())).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::NoHeadlessResolver;

    #[test]
    fn bare_ip_host_is_detected() {
        assert!(points_to_bare_ip("http://203.0.113.5/path"));
        assert!(!points_to_bare_ip("http://sportsbook.example.com/path"));
    }

    #[tokio::test]
    async fn falls_back_to_configured_base_url_when_unresolvable() {
        let resolver = MirrorResolver::new(
            "http://127.0.0.1:1/unreachable".to_string(),
            Some("https://fallback.example.com".to_string()),
            Duration::from_secs(300),
            Duration::from_millis(50),
            Arc::new(NoHeadlessResolver),
        );
        let result = resolver.ensure_resolved().await.unwrap();
        assert_eq!(result, "https://fallback.example.com");
    }
}
