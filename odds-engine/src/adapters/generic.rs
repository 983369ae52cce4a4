//! Shared adapter shape for bookmakers whose wire format needs nothing
//! beyond "fetch one flat event listing, map vendor codes, build" — factored
//! out so 1xbet/Olimp/Leon don't each reimplement start/stop/single-flight
//! plumbing.

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{Adapter, SingleFlight};
use crate::error::AdapterError;
use crate::model::Match;
use crate::store::MergeStore;
use crate::transport::HttpClient;

/// Translates one vendor response into canonical matches. Implemented per
/// bookmaker; holds that bookmaker's code table.
pub trait VendorParser<R>: Send + Sync {
    fn build_matches(&self, response: &R, now: chrono::DateTime<Utc>) -> Vec<Match>;
}

pub struct GenericVendorAdapter<R: DeserializeOwned + Send + Sync, P: VendorParser<R>> {
    name: &'static str,
    listing_path: &'static str,
    http: HttpClient,
    parser: P,
    store: Arc<MergeStore<Match>>,
    single_flight: SingleFlight,
    _response: std::marker::PhantomData<R>,
}

impl<R: DeserializeOwned + Send + Sync, P: VendorParser<R>> GenericVendorAdapter<R, P> {
    pub fn new(name: &'static str, listing_path: &'static str, http: HttpClient, parser: P, store: Arc<MergeStore<Match>>) -> Self {
        Self { name, listing_path, http, parser, store, single_flight: SingleFlight::new(), _response: std::marker::PhantomData }
    }
}

#[async_trait]
impl<R, P> Adapter for GenericVendorAdapter<R, P>
where
    R: DeserializeOwned + Send + Sync,
    P: VendorParser<R> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn start(&self, cancellation: CancellationToken) -> Result<(), AdapterError> {
        cancellation.cancelled().await;
        Ok(())
    }

    async fn parse_once(&self) -> Result<(), AdapterError> {
        let result = self
            .single_flight
            .run(self.name, || async {
                let response: R = self.http.get_json(self.listing_path).await?;
                let now = Utc::now();
                let matches = self.parser.build_matches(&response, now);
                let count = matches.len();
                for m in matches {
                    self.store.add(m);
                }
                info!(adapter = self.name, matches = count, "parse cycle complete");
                Ok::<(), AdapterError>(())
            })
            .await;

        match result {
            Some(r) => r,
            None => {
                warn!(adapter = self.name, "skipped tick, previous cycle still in flight");
                Ok(())
            }
        }
    }
}
