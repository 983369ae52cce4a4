//! Headless-browser mirror resolution — external collaborator.
//!
//! The browser itself is out of scope here; this module only fixes the
//! contract a real headless-browser driver must satisfy, plus a process-wide
//! mutex enforcing "at most one browser instance runs at a time across all
//! adapters".

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::MirrorError;

#[async_trait]
pub trait HeadlessResolver: Send + Sync {
    /// Load `url`, wait at least 3 seconds for JS navigation, and return
    /// `document.location` — the later value if navigation happens after the
    /// wait. The user-data directory is wiped before each invocation by the
    /// implementation.
    async fn resolve(&self, url: &str) -> Result<String, MirrorError>;
}

/// Wraps any `HeadlessResolver` with the process-wide single-instance mutex
/// the contract requires.
pub struct SerializedHeadlessResolver<R: HeadlessResolver> {
    inner: R,
    lock: Arc<Mutex<()>>,
}

impl<R: HeadlessResolver> SerializedHeadlessResolver<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, lock: Arc::new(Mutex::new(())) }
    }
}

#[async_trait]
impl<R: HeadlessResolver> HeadlessResolver for SerializedHeadlessResolver<R> {
    async fn resolve(&self, url: &str) -> Result<String, MirrorError> {
        let _guard = self.lock.lock().await;
        self.inner.resolve(url).await
    }
}

/// No browser configured; any mirror that needs one fails to resolve.
pub struct NoHeadlessResolver;

#[async_trait]
impl HeadlessResolver for NoHeadlessResolver {
    async fn resolve(&self, _url: &str) -> Result<String, MirrorError> {
        Err(MirrorError::Unresolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_headless_resolver_always_fails() {
        let resolver = NoHeadlessResolver;
        assert!(resolver.resolve("https://example.com").await.is_err());
    }

    #[tokio::test]
    async fn serialized_resolver_serializes_concurrent_calls() {
        struct Echo;
        #[async_trait]
        impl HeadlessResolver for Echo {
            async fn resolve(&self, url: &str) -> Result<String, MirrorError> {
                Ok(url.to_string())
            }
        }

        let resolver = Arc::new(SerializedHeadlessResolver::new(Echo));
        let a = resolver.clone();
        let b = resolver.clone();
        let (ra, rb) = tokio::join!(a.resolve("https://a"), b.resolve("https://b"));
        assert_eq!(ra.unwrap(), "https://a");
        assert_eq!(rb.unwrap(), "https://b");
    }
}
