pub mod backoff;
pub mod http_client;
pub mod mirror_resolver;
pub mod proxy_pool;

pub use http_client::HttpClient;
pub use mirror_resolver::MirrorResolver;
pub use proxy_pool::ProxyPool;
