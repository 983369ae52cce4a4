//! Read API — the pure handlers, shared by the standalone per-bookmaker
//! binary (local store) and the orchestrator binary (remote aggregation).

use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::Adapter;
use crate::model::{EsportsMatch, Match};
use crate::registry::AdapterRegistry;
use crate::store::MergeStore;

/// Where `get_matches` should read from. `Remote` takes an async fan-out
/// closure rather than a concrete orchestrator type so this module has no
/// HTTP dependency of its own.
pub enum MatchSource<'a> {
    Local(&'a MergeStore<Match>),
    Remote(&'a (dyn Fn() -> BoxFuture<'a, Vec<Match>> + Sync)),
}

pub enum EsportsSource<'a> {
    Local(&'a MergeStore<EsportsMatch>),
    Remote(&'a (dyn Fn() -> BoxFuture<'a, Vec<EsportsMatch>> + Sync)),
}

pub async fn get_matches<'a>(source: &MatchSource<'a>) -> Vec<Match> {
    match source {
        MatchSource::Local(store) => store.list(),
        MatchSource::Remote(fetch) => fetch().await,
    }
}

pub async fn get_esports_matches<'a>(source: &EsportsSource<'a>) -> Vec<EsportsMatch> {
    match source {
        EsportsSource::Local(store) => store.list(),
        EsportsSource::Remote(fetch) => fetch().await,
    }
}

/// Local mode delegates to `list_by_name`; remote mode aggregates first then
/// applies the identical substring rule in-process, so behavior does not
/// depend on deployment mode.
pub async fn get_matches_by_name<'a>(source: &MatchSource<'a>, query: &str) -> Vec<Match> {
    match source {
        MatchSource::Local(store) => store.list_by_name(query),
        MatchSource::Remote(fetch) => filter_by_name(fetch().await, query),
    }
}

fn filter_by_name(matches: Vec<Match>, query: &str) -> Vec<Match> {
    let needle = query.to_lowercase();
    let mut out: Vec<Match> = matches
        .into_iter()
        .filter(|m| {
            let dash = format!("{} - {}", m.home_team, m.away_team);
            let vs = format!("{} vs {}", m.home_team, m.away_team);
            [m.name.as_str(), m.home_team.as_str(), m.away_team.as_str(), dash.as_str(), vs.as_str()].iter().any(|field| field.to_lowercase().contains(&needle))
        })
        .collect();
    out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    out
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ParseOnceOutcome {
    pub adapter: String,
    pub ok: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ParseOnceReport {
    pub results: Vec<ParseOnceOutcome>,
}

/// `name = None` runs every registered/enabled adapter concurrently;
/// `Some(name)` runs just that one. Never propagates the first error — one
/// adapter failing does not stop the others from reporting their own result.
pub async fn trigger_parse(registry: &AdapterRegistry, name: Option<&str>, timeout: Duration) -> ParseOnceReport {
    let targets: Vec<Arc<dyn Adapter>> = match name {
        Some(n) => registry.get(n).into_iter().collect(),
        None => registry.active().to_vec(),
    };

    let mut handles = Vec::with_capacity(targets.len());
    for adapter in targets {
        handles.push(tokio::spawn(async move {
            let name = adapter.name().to_string();
            match tokio::time::timeout(timeout, adapter.parse_once()).await {
                Ok(Ok(())) => ParseOnceOutcome { adapter: name, ok: true, error: None },
                Ok(Err(e)) => ParseOnceOutcome { adapter: name, ok: false, error: Some(e.to_string()) },
                Err(_) => ParseOnceOutcome { adapter: name, ok: false, error: Some("timed out".to_string()) },
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        if let Ok(outcome) = handle.await {
            results.push(outcome);
        }
    }

    ParseOnceReport { results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchBuilder, OutcomeType, Sport, StandardEventType};
    use chrono::{TimeZone, Utc};

    fn ts() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 16, 40, 0).unwrap()
    }

    #[tokio::test]
    async fn local_source_delegates_to_store_list() {
        let store: MergeStore<Match> = MergeStore::new();
        let mut builder = MatchBuilder::new("A", "B", ts(), Sport::Football, "League", "fonbet");
        builder.add_outcome(StandardEventType::MainMatch, OutcomeType::HomeWin, "", 2.0);
        store.add(builder.build(ts()).unwrap());

        let matches = get_matches(&MatchSource::Local(&store)).await;
        assert_eq!(matches.len(), 1);
    }

    #[tokio::test]
    async fn remote_source_filters_by_name_consistently_with_local() {
        let mut builder = MatchBuilder::new("Bayern Munich", "Real Madrid", ts(), Sport::Football, "UCL", "fonbet");
        builder.add_outcome(StandardEventType::MainMatch, OutcomeType::HomeWin, "", 2.1);
        let m = builder.build(ts()).unwrap();

        let fetch = move || {
            let m = m.clone();
            Box::pin(async move { vec![m] }) as BoxFuture<'_, Vec<Match>>
        };
        let matched = get_matches_by_name(&MatchSource::Remote(&fetch), "real madrid").await;
        assert_eq!(matched.len(), 1);

        let unmatched = get_matches_by_name(&MatchSource::Remote(&fetch), "nonexistent").await;
        assert_eq!(unmatched.len(), 0);
    }
}
