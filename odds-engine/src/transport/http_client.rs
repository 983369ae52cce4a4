//! Per-adapter HTTP client.
//!
//! Ties together mirror resolution, proxy rotation and backoff into the one
//! call each adapter's fetch step needs. `Content-Encoding` decoding is
//! handled transparently by reqwest's `gzip`/`brotli`/`zstd` features; this
//! layer only decides *which* body counts as success.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use super::backoff::with_linear_backoff;
use super::mirror_resolver::MirrorResolver;
use super::proxy_pool::ProxyPool;
use crate::error::{AdapterError, DecodeError, TransportError};

pub struct HttpClient {
    name: String,
    mirror: Option<Arc<MirrorResolver>>,
    static_base_url: Option<String>,
    proxy_pool: ProxyPool,
    headers: Vec<(String, String)>,
}

impl HttpClient {
    pub fn new(name: impl Into<String>, mirror: Option<Arc<MirrorResolver>>, static_base_url: Option<String>, proxy_list: Vec<String>, timeout: Duration, headers: Vec<(String, String)>) -> Self {
        Self { name: name.into(), mirror, static_base_url, proxy_pool: ProxyPool::new(proxy_list, timeout), headers }
    }

    async fn base_url(&self) -> Result<String, AdapterError> {
        if let Some(mirror) = &self.mirror {
            return Ok(mirror.ensure_resolved().await?);
        }
        self.static_base_url.clone().ok_or(AdapterError::MirrorUnresolved(crate::error::MirrorError::Unresolved))
    }

    /// Fetch and decode `path` as JSON of type `T`, retrying per the linear
    /// backoff contract.
    ///
    /// A body that isn't JSON at all (an HTML error page, an empty response)
    /// is a transport failure — the pool never found a usable host.
    /// A body that does look like JSON but doesn't match `T`'s shape is a
    /// decode failure instead: the host answered, the payload just doesn't
    /// parse into what this adapter expects. Per-item tolerance (one
    /// unrecognized market/outcome code inside an otherwise well-formed
    /// response) lives downstream of this call, in each adapter's code-table
    /// lookups returning `None` and being skipped rather than failing here.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AdapterError> {
        let base_url = self.base_url().await?;
        let url = format!("{}{}", base_url.trim_end_matches('/'), path);

        let fetched = with_linear_backoff(&self.name, || self.proxy_pool.get(&url, &self.headers)).await?;

        if !fetched.looks_like_json() {
            error!(adapter = %self.name, url = %url, status = fetched.status, "response body does not look like JSON");
            return Err(AdapterError::Transport(TransportError::NotJson { status: fetched.status, content_type: fetched.content_type.clone() }));
        }

        serde_json::from_str(&fetched.body).map_err(|e| {
            error!(adapter = %self.name, url = %url, error = %e, "response body was JSON but did not match the expected shape");
            AdapterError::Decode(DecodeError::Shape(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_mirror_and_base_url_is_unresolved() {
        let client = HttpClient::new("test", None, None, vec![], Duration::from_secs(5), vec![]);
        let result: Result<serde_json::Value, _> = client.get_json("/anything").await;
        assert!(matches!(result, Err(AdapterError::MirrorUnresolved(_))));
    }

    #[test]
    fn html_body_is_classified_as_transport_not_decode() {
        use crate::transport::proxy_pool::FetchedBody;
        #[derive(serde::Deserialize)]
        struct Shape {
            #[allow(dead_code)]
            field: String,
        }
        let fetched = FetchedBody { status: 200, content_type: None, body: "<html>blocked</html>".to_string() };
        assert!(!fetched.looks_like_json());
        let err = serde_json::from_str::<Shape>(&fetched.body).unwrap_err();
        let classified = if fetched.looks_like_json() {
            AdapterError::Decode(DecodeError::Shape(err.to_string()))
        } else {
            AdapterError::Transport(TransportError::NotJson { status: fetched.status, content_type: fetched.content_type })
        };
        assert!(matches!(classified, AdapterError::Transport(TransportError::NotJson { .. })));
    }

    #[test]
    fn shape_mismatch_on_genuine_json_is_classified_as_decode() {
        use crate::transport::proxy_pool::FetchedBody;
        #[derive(serde::Deserialize)]
        struct Shape {
            #[allow(dead_code)]
            field: String,
        }
        let fetched = FetchedBody { status: 200, content_type: Some("application/json".to_string()), body: "{\"other\":1}".to_string() };
        assert!(fetched.looks_like_json());
        let err = serde_json::from_str::<Shape>(&fetched.body).unwrap_err();
        let classified = if fetched.looks_like_json() {
            AdapterError::Decode(DecodeError::Shape(err.to_string()))
        } else {
            AdapterError::Transport(TransportError::NotJson { status: fetched.status, content_type: fetched.content_type })
        };
        assert!(matches!(classified, AdapterError::Decode(_)));
    }
}
