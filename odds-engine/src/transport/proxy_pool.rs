//! Proxy pool with round-robin rotation and a persisted last-successful index.

use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::warn;

use crate::error::TransportError;

/// A GET response accepted as a successful fetch: 2xx status and a body that
/// looks like JSON, not the HTML error page some proxies substitute.
pub struct FetchedBody {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchedBody {
    pub(crate) fn looks_like_json(&self) -> bool {
        let is_json_content_type = self.content_type.as_deref().map(|ct| ct.contains("application/json")).unwrap_or(false);
        let trimmed = self.body.trim_start();
        let starts_like_html = trimmed.as_bytes().first() == Some(&b'<');
        (200..300).contains(&self.status) && !starts_like_html && (is_json_content_type || trimmed.starts_with('{') || trimmed.starts_with('['))
    }
}

pub struct ProxyPool {
    client: Client,
    proxies: Vec<String>,
    /// Index of the proxy that last succeeded; round-robin starts here.
    last_successful: AtomicUsize,
    timeout: Duration,
}

impl ProxyPool {
    pub fn new(proxies: Vec<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder().build().unwrap_or_default(),
            proxies,
            last_successful: AtomicUsize::new(0),
            timeout,
        }
    }

    /// GET `url`, trying proxies round-robin from the last successful index,
    /// falling back to a direct connection after the pool is exhausted.
    pub async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<FetchedBody, TransportError> {
        let n = self.proxies.len();
        let start = self.last_successful.load(Ordering::SeqCst);

        for offset in 0..n {
            let idx = (start + offset) % n;
            let proxy_url = &self.proxies[idx];
            match self.try_once(url, headers, Some(proxy_url)).await {
                Ok(fetched) if fetched.looks_like_json() => {
                    self.last_successful.store(idx, Ordering::SeqCst);
                    return Ok(fetched);
                }
                Ok(_) => warn!(proxy = %proxy_url, "proxy returned a non-JSON body, trying next"),
                Err(e) => warn!(proxy = %proxy_url, error = %e, "proxy request failed, trying next"),
            }
        }

        self.try_once(url, headers, None).await
    }

    async fn try_once(&self, url: &str, headers: &[(String, String)], proxy: Option<&str>) -> Result<FetchedBody, TransportError> {
        let client = match proxy {
            Some(p) => {
                let proxy = reqwest::Proxy::all(p).map_err(|e| TransportError::Request(e.to_string()))?;
                Client::builder().proxy(proxy).timeout(self.timeout).build().map_err(|e| TransportError::Request(e.to_string()))?
            }
            None => self.client.clone(),
        };

        let mut req = client.get(url);
        for (k, v) in headers {
            req = req.header(k, v);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let content_type = response.headers().get(reqwest::header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(|s| s.to_string());
        let body = response.text().await.map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(FetchedBody { status, content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_body_is_rejected_as_json() {
        let fetched = FetchedBody { status: 200, content_type: None, body: "<html>blocked</html>".to_string() };
        assert!(!fetched.looks_like_json());
    }

    #[test]
    fn json_content_type_is_accepted() {
        let fetched = FetchedBody { status: 200, content_type: Some("application/json; charset=utf-8".to_string()), body: "{}".to_string() };
        assert!(fetched.looks_like_json());
    }

    #[test]
    fn non_2xx_status_is_rejected() {
        let fetched = FetchedBody { status: 502, content_type: Some("application/json".to_string()), body: "{}".to_string() };
        assert!(!fetched.looks_like_json());
    }
}
