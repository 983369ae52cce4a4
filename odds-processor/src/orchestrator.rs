//! Orchestrator mode — treats remote per-bookmaker service instances as
//! adapters: fans out to `{base}/matches` (or `/esports/matches`) and merges
//! with the same store rules; `parse_once` is `{base}/parse`.

use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

use odds_engine::model::{EsportsMatch, Match};
use odds_engine::store::MergeStore;

pub struct RemoteService {
    pub name: String,
    pub base_url: String,
}

pub struct Orchestrator {
    client: Client,
    services: Vec<RemoteService>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(services: Vec<RemoteService>, timeout: Duration) -> Self {
        Self { client: Client::builder().build().unwrap_or_default(), services, timeout }
    }

    pub fn service_names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.name.as_str()).collect()
    }

    /// `RemoteAdapter::parse_once` — GET `{base}/parse`; non-200 is a failure.
    pub async fn parse_once(&self, name: &str) -> Result<(), String> {
        let service = self.services.iter().find(|s| s.name == name).ok_or_else(|| format!("unknown service: {name}"))?;
        let url = format!("{}/parse", service.base_url.trim_end_matches('/'));
        let response = self.client.post(&url).timeout(self.timeout).send().await.map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("{name} returned status {}", response.status()));
        }
        Ok(())
    }

    /// Fan out `{base}/matches` to all services in parallel with a shared
    /// deadline, merging through `merge_lists`. A service returning non-200
    /// is a failed contribution; the aggregate still reflects whatever
    /// partial data did return.
    pub async fn aggregate_matches(&self, store: &MergeStore<Match>) -> Vec<Match> {
        let fetches = self.services.iter().map(|service| self.fetch_matches(service));
        let lists: Vec<Vec<Match>> = join_all(fetches).await.into_iter().flatten().collect();
        store.merge_lists(lists)
    }

    pub async fn aggregate_esports_matches(&self, store: &MergeStore<EsportsMatch>) -> Vec<EsportsMatch> {
        let fetches = self.services.iter().map(|service| self.fetch_esports_matches(service));
        let lists: Vec<Vec<EsportsMatch>> = join_all(fetches).await.into_iter().flatten().collect();
        store.merge_lists(lists)
    }

    async fn fetch_matches(&self, service: &RemoteService) -> Option<Vec<Match>> {
        let url = format!("{}/matches", service.base_url.trim_end_matches('/'));
        self.fetch_json(&service.name, &url).await
    }

    async fn fetch_esports_matches(&self, service: &RemoteService) -> Option<Vec<EsportsMatch>> {
        let url = format!("{}/esports/matches", service.base_url.trim_end_matches('/'));
        self.fetch_json(&service.name, &url).await
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, name: &str, url: &str) -> Option<Vec<T>> {
        match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) if response.status().is_success() => match response.json::<Vec<T>>().await {
                Ok(list) => Some(list),
                Err(e) => {
                    warn!(service = name, error = %e, "failed to decode remote matches response");
                    None
                }
            },
            Ok(response) => {
                warn!(service = name, status = %response.status(), "remote service returned non-success status");
                None
            }
            Err(e) => {
                warn!(service = name, error = %e, "remote service request failed");
                None
            }
        }
    }
}
