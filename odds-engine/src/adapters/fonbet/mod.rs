//! Fonbet adapter — the hierarchical vendor shape, distinct from the flat
//! generic pipeline the simpler bookmaker adapters follow.

pub mod codes;
pub mod types;

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::adapters::{passes_match_filter, Adapter, SingleFlight};
use crate::error::AdapterError;
use crate::model::{EsportsMatch, EsportsMatchBuilder, Match, MatchBuilder, Sport};
use crate::store::MergeStore;
use crate::transport::HttpClient;

use self::codes::{esports_alias_for_category, map_event_kind, map_factor, sport_category_id};
use self::types::{FonbetCustomFactor, FonbetEvent, FonbetResponse};

/// EMA-based dynamic batch sizer.
pub struct BatchSizer {
    target: Duration,
    ema: StdMutex<Duration>,
    size: StdMutex<usize>,
    min_size: usize,
    max_size: usize,
}

impl BatchSizer {
    pub fn new(target: Duration, initial_size: usize, min_size: usize, max_size: usize) -> Self {
        Self { target, ema: StdMutex::new(target), size: StdMutex::new(initial_size), min_size, max_size }
    }

    pub fn current_size(&self) -> usize {
        *self.size.lock().unwrap()
    }

    /// Record a batch's observed duration and adjust the next batch size:
    /// shrink 0.8x when a batch runs over 1.5x target, grow 1.2x when under
    /// 0.5x, clamped to [min_size, max_size].
    pub fn record(&self, elapsed: Duration) {
        let mut ema = self.ema.lock().unwrap();
        *ema = Duration::from_secs_f64(ema.as_secs_f64() * 0.7 + elapsed.as_secs_f64() * 0.3);

        let mut size = self.size.lock().unwrap();
        if *ema > self.target.mul_f64(1.5) {
            *size = ((*size as f64 * 0.8) as usize).max(self.min_size);
        } else if *ema < self.target.mul_f64(0.5) {
            *size = ((*size as f64 * 1.2) as usize).min(self.max_size);
        }
    }
}

/// Whether a built match belongs in the team-sport store or the esports
/// store. `FonbetAdapter` is constructed for one `Sport` at a time; this
/// just carries the two possible outputs of `build_matches` without forcing
/// a `Match`/`EsportsMatch` duplicate code path through the caller.
enum BuiltMatch {
    Team(Match),
    Esports(EsportsMatch),
}

pub struct FonbetAdapter {
    http: HttpClient,
    sport: Sport,
    store: Arc<MergeStore<Match>>,
    esports_store: Arc<MergeStore<EsportsMatch>>,
    single_flight: SingleFlight,
    batch_sizer: BatchSizer,
}

impl FonbetAdapter {
    pub fn new(http: HttpClient, sport: Sport, store: Arc<MergeStore<Match>>, esports_store: Arc<MergeStore<EsportsMatch>>) -> Self {
        Self {
            http,
            sport,
            store,
            esports_store,
            single_flight: SingleFlight::new(),
            batch_sizer: BatchSizer::new(Duration::from_secs(3), 50, 10, 200),
        }
    }

    async fn fetch_listings(&self) -> Result<FonbetResponse, AdapterError> {
        self.http.get_json("/events").await
    }

    fn sport_matches(&self, event: &FonbetEvent) -> bool {
        match event.sport_category_id {
            Some(category_id) => match esports_alias_for_category(category_id) {
                Some(alias) => self.sport.is_esport() && self.sport.as_str() == alias,
                None => !self.sport.is_esport() && Some(category_id) == sport_category_id(self.sport),
            },
            None => !self.sport.is_esport(),
        }
    }

    /// Builds matches for `self.sport`: team-sport fixtures go through
    /// `MatchBuilder` into `BuiltMatch::Team`, esports fixtures go through
    /// `EsportsMatchBuilder` into `BuiltMatch::Esports` — which universe is
    /// fixed by `self.sport.is_esport()`, never mixed.
    fn build_matches(&self, response: &FonbetResponse, now: chrono::DateTime<Utc>) -> Vec<BuiltMatch> {
        let factors_by_event: std::collections::HashMap<i64, Vec<&FonbetCustomFactor>> = {
            let mut map: std::collections::HashMap<i64, Vec<&FonbetCustomFactor>> = std::collections::HashMap::new();
            for factor in &response.custom_factors {
                map.entry(factor.event_id).or_default().push(factor);
            }
            map
        };

        let mut matches = Vec::new();

        for event in response.events.iter().filter(|e| e.level == 1 && self.sport_matches(e)) {
            if !passes_match_filter(&event.team1, &event.team2, &event.name, event.start_time, now) {
                continue;
            }

            let children: Vec<&FonbetEvent> = response.events.iter().filter(|e| e.parent_id == Some(event.id)).collect();
            let mut groups = vec![(event.id, None)];
            groups.extend(children.iter().map(|c| (c.id, map_event_kind(c.kind))));

            if self.sport.is_esport() {
                let mut builder = EsportsMatchBuilder::new(event.team1.clone(), event.team2.clone(), event.start_time, self.sport, event.league_name.clone(), "fonbet");
                apply_groups(&mut builder, &groups, &factors_by_event);
                if let Some(m) = builder.build(now) {
                    matches.push(BuiltMatch::Esports(m));
                }
            } else {
                let mut builder = MatchBuilder::new(event.team1.clone(), event.team2.clone(), event.start_time, self.sport, event.league_name.clone(), "fonbet");
                apply_groups(&mut builder, &groups, &factors_by_event);
                if let Some(m) = builder.build(now) {
                    matches.push(BuiltMatch::Team(m));
                }
            }
        }

        matches
    }
}

/// Shared outcome-adding step between `MatchBuilder` and `EsportsMatchBuilder`
/// — both expose the same `add_outcome` signature.
trait AddsOutcomes {
    fn add_outcome(&mut self, event_type: crate::model::StandardEventType, outcome_type: crate::model::OutcomeType, parameter: impl Into<String>, odds: f64) -> &mut Self;
}

impl AddsOutcomes for MatchBuilder {
    fn add_outcome(&mut self, event_type: crate::model::StandardEventType, outcome_type: crate::model::OutcomeType, parameter: impl Into<String>, odds: f64) -> &mut Self {
        MatchBuilder::add_outcome(self, event_type, outcome_type, parameter, odds)
    }
}

impl AddsOutcomes for EsportsMatchBuilder {
    fn add_outcome(&mut self, event_type: crate::model::StandardEventType, outcome_type: crate::model::OutcomeType, parameter: impl Into<String>, odds: f64) -> &mut Self {
        EsportsMatchBuilder::add_outcome(self, event_type, outcome_type, parameter, odds)
    }
}

fn apply_groups<B: AddsOutcomes>(builder: &mut B, groups: &[(i64, Option<crate::model::StandardEventType>)], factors_by_event: &std::collections::HashMap<i64, Vec<&FonbetCustomFactor>>) {
    for (event_id, standard_event_type) in groups {
        let Some(standard_event_type) = standard_event_type.or(Some(crate::model::StandardEventType::MainMatch)) else {
            continue;
        };
        if let Some(factors) = factors_by_event.get(event_id) {
            for factor in factors {
                if let Some((outcome_type, parameter)) = map_factor(factor.factor, factor.param) {
                    builder.add_outcome(standard_event_type, outcome_type, parameter, factor.value);
                }
            }
        }
    }
}

#[async_trait]
impl Adapter for FonbetAdapter {
    fn name(&self) -> &str {
        "fonbet"
    }

    async fn start(&self, cancellation: CancellationToken) -> Result<(), AdapterError> {
        cancellation.cancelled().await;
        Ok(())
    }

    async fn parse_once(&self) -> Result<(), AdapterError> {
        let result = self
            .single_flight
            .run("fonbet", || async {
                let started = Instant::now();
                let response = self.fetch_listings().await?;
                let now = Utc::now();
                let matches = self.build_matches(&response, now);
                let count = matches.len();
                for m in matches {
                    match m {
                        BuiltMatch::Team(m) => self.store.add(m),
                        BuiltMatch::Esports(m) => self.esports_store.add(m),
                    }
                }
                self.batch_sizer.record(started.elapsed());
                info!(adapter = "fonbet", matches = count, "parse cycle complete");
                Ok::<(), AdapterError>(())
            })
            .await;

        match result {
            Some(r) => r,
            None => {
                warn!(adapter = "fonbet", "skipped tick, previous cycle still in flight");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_sizer_shrinks_on_slow_batch() {
        let sizer = BatchSizer::new(Duration::from_secs(3), 100, 10, 200);
        for _ in 0..5 {
            sizer.record(Duration::from_secs(10));
        }
        assert!(sizer.current_size() < 100);
    }

    #[test]
    fn batch_sizer_grows_on_fast_batch() {
        let sizer = BatchSizer::new(Duration::from_secs(3), 100, 10, 200);
        for _ in 0..5 {
            sizer.record(Duration::from_millis(500));
        }
        assert!(sizer.current_size() > 100);
    }

    #[test]
    fn batch_sizer_respects_bounds() {
        let sizer = BatchSizer::new(Duration::from_secs(3), 100, 50, 120);
        for _ in 0..20 {
            sizer.record(Duration::from_secs(30));
        }
        assert_eq!(sizer.current_size(), 50);
    }

    fn adapter(sport: Sport) -> FonbetAdapter {
        let http = HttpClient::new("fonbet", None, Some("http://fonbet.example.com".to_string()), vec![], Duration::from_secs(5), vec![]);
        FonbetAdapter::new(http, sport, Arc::new(MergeStore::new()), Arc::new(MergeStore::new()))
    }

    fn sample_response(sport_category_id: Option<i64>) -> FonbetResponse {
        FonbetResponse {
            events: vec![FonbetEvent {
                id: 1,
                level: 1,
                parent_id: None,
                kind: 0,
                name: "A vs B".to_string(),
                team1: "Team A".to_string(),
                team2: "Team B".to_string(),
                start_time: Utc::now() + chrono::Duration::hours(1),
                league_name: "League".to_string(),
                sport_category_id,
            }],
            custom_factors: vec![FonbetCustomFactor { event_id: 1, factor: 921, value: 1.9, param: None }],
        }
    }

    #[test]
    fn esports_category_builds_an_esports_match_not_a_team_match() {
        let adapter = adapter(Sport::Dota2);
        let response = sample_response(Some(19)); // dota2 category id
        let matches = adapter.build_matches(&response, Utc::now());
        assert_eq!(matches.len(), 1);
        assert!(matches!(matches[0], BuiltMatch::Esports(_)));
    }

    #[test]
    fn team_sport_category_builds_a_team_match() {
        let adapter = adapter(Sport::Football);
        let response = sample_response(Some(1)); // football category id
        let matches = adapter.build_matches(&response, Utc::now());
        assert_eq!(matches.len(), 1);
        assert!(matches!(matches[0], BuiltMatch::Team(_)));
    }

    #[test]
    fn mismatched_sport_category_yields_no_matches() {
        let adapter = adapter(Sport::Football);
        let response = sample_response(Some(19)); // dota2 category id, adapter is football
        let matches = adapter.build_matches(&response, Utc::now());
        assert!(matches.is_empty());
    }
}
