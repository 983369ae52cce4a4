//! Pinnacle adapter.

pub mod codes;
pub mod types;

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::adapters::{passes_match_filter, Adapter, SingleFlight};
use crate::error::AdapterError;
use crate::model::{american_to_decimal, format_handicap_parameter, format_total_parameter, Match, MatchBuilder, OutcomeType, Sport, StandardEventType};
use crate::store::MergeStore;
use crate::transport::HttpClient;

use self::codes::map_related_matchup;
use self::types::{PinnacleGuestLeaguesResponse, PinnacleLeaguesResponse, PinnaclePeriod};

const FULL_MATCH_PERIOD: &str = "0";

pub struct PinnacleAdapter {
    /// Primary guest API: static host, enumerates leagues/events on offer.
    guest_http: HttpClient,
    /// Odds endpoint: distinct, dynamically-resolved host carrying quotes.
    odds_http: HttpClient,
    store: Arc<MergeStore<Match>>,
    single_flight: SingleFlight,
}

impl PinnacleAdapter {
    pub fn new(guest_http: HttpClient, odds_http: HttpClient, store: Arc<MergeStore<Match>>) -> Self {
        Self { guest_http, odds_http, store, single_flight: SingleFlight::new() }
    }

    async fn fetch_guest_leagues(&self) -> Result<PinnacleGuestLeaguesResponse, AdapterError> {
        self.guest_http.get_json("/leagues").await
    }

    async fn fetch_odds(&self) -> Result<PinnacleLeaguesResponse, AdapterError> {
        self.odds_http.get_json("/odds").await
    }

    /// Joins the guest listing (which events are on offer) against the odds
    /// response (what they're quoted at) by league name + home/away/start
    /// time. A guest event with no matching odds entry is skipped — the
    /// odds host just hasn't caught up yet.
    fn build_matches(&self, guest: &PinnacleGuestLeaguesResponse, odds: &PinnacleLeaguesResponse, now: chrono::DateTime<Utc>) -> Vec<Match> {
        let mut matches = Vec::new();

        for guest_league in &guest.leagues {
            let Some(odds_league) = odds.leagues.iter().find(|l| l.name == guest_league.name) else {
                continue;
            };

            for guest_event in &guest_league.events {
                if !passes_match_filter(&guest_event.home, &guest_event.away, "", guest_event.start_time, now) {
                    continue;
                }

                let Some(odds_event) = odds_league.events.iter().find(|e| e.home == guest_event.home && e.away == guest_event.away && e.start_time == guest_event.start_time) else {
                    continue;
                };

                let Some(full_match) = odds_event.periods.iter().find(|p| p.number == FULL_MATCH_PERIOD) else {
                    continue;
                };

                let mut builder = MatchBuilder::new(guest_event.home.clone(), guest_event.away.clone(), guest_event.start_time, Sport::Football, guest_league.name.clone(), "pinnacle");

                add_period_outcomes(&mut builder, StandardEventType::MainMatch, full_match);

                if let Some(units) = &guest_event.units {
                    if let Some(standard_event_type) = map_related_matchup(units).or_else(|| map_related_matchup(&guest_league.name)) {
                        add_period_outcomes(&mut builder, standard_event_type, full_match);
                    }
                }

                if let Some(m) = builder.build(now) {
                    matches.push(m);
                }
            }
        }

        matches
    }
}

/// Emit moneyline + the main handicap/total line, falling back to the first
/// alternate line when no main line is open.
fn add_period_outcomes(builder: &mut MatchBuilder, event_type: StandardEventType, period: &PinnaclePeriod) {
    if let Some(money_line) = &period.money_line {
        builder.add_outcome(event_type, OutcomeType::HomeWin, "", american_to_decimal(money_line.home));
        if let Some(draw) = money_line.draw {
            builder.add_outcome(event_type, OutcomeType::Draw, "", american_to_decimal(draw));
        }
        builder.add_outcome(event_type, OutcomeType::AwayWin, "", american_to_decimal(money_line.away));
    }

    let main_handicap = period.index_main_line_hdp.and_then(|idx| period.handicap.get(idx)).or_else(|| period.handicap.first());
    if let Some(line) = main_handicap {
        builder.add_outcome(event_type, OutcomeType::HandicapHome, format_handicap_parameter(line.points), american_to_decimal(line.home));
        builder.add_outcome(event_type, OutcomeType::HandicapAway, format_handicap_parameter(-line.points), american_to_decimal(line.away));
    }

    let main_total = period.index_main_line_ou.and_then(|idx| period.over_under.get(idx)).or_else(|| period.over_under.first());
    if let Some(line) = main_total {
        builder.add_outcome(event_type, OutcomeType::TotalOver, format_total_parameter(line.points), american_to_decimal(line.over));
        builder.add_outcome(event_type, OutcomeType::TotalUnder, format_total_parameter(line.points), american_to_decimal(line.under));
    }
}

#[async_trait]
impl Adapter for PinnacleAdapter {
    fn name(&self) -> &str {
        "pinnacle"
    }

    async fn start(&self, cancellation: CancellationToken) -> Result<(), AdapterError> {
        cancellation.cancelled().await;
        Ok(())
    }

    async fn parse_once(&self) -> Result<(), AdapterError> {
        let result = self
            .single_flight
            .run("pinnacle", || async {
                let guest = self.fetch_guest_leagues().await?;
                let odds = self.fetch_odds().await?;
                let now = Utc::now();
                let matches = self.build_matches(&guest, &odds, now);
                let count = matches.len();
                for m in matches {
                    self.store.add(m);
                }
                info!(adapter = "pinnacle", matches = count, "parse cycle complete");
                Ok::<(), AdapterError>(())
            })
            .await;

        match result {
            Some(r) => r,
            None => {
                warn!(adapter = "pinnacle", "skipped tick, previous cycle still in flight");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::pinnacle::types::{PinnacleHandicapLine, PinnacleMoneyLine, PinnacleTotalLine};

    fn period_with_alt_lines_only() -> PinnaclePeriod {
        PinnaclePeriod {
            number: "0".to_string(),
            money_line: Some(PinnacleMoneyLine { home: -150.0, draw: Some(240.0), away: 400.0 }),
            handicap: vec![PinnacleHandicapLine { home: -110.0, away: -110.0, points: -0.5 }],
            over_under: vec![PinnacleTotalLine { over: -105.0, under: -115.0, points: 2.5 }],
            index_main_line_hdp: None,
            index_main_line_ou: None,
        }
    }

    #[test]
    fn falls_back_to_first_line_when_no_main_line_index() {
        let mut builder = MatchBuilder::new("A", "B", Utc::now() + chrono::Duration::hours(1), Sport::Football, "League", "pinnacle");
        add_period_outcomes(&mut builder, StandardEventType::MainMatch, &period_with_alt_lines_only());
        assert!(builder.has_outcomes());
    }

    #[test]
    fn american_moneyline_converted_to_decimal() {
        let mut builder = MatchBuilder::new("A", "B", Utc::now() + chrono::Duration::hours(1), Sport::Football, "League", "pinnacle");
        add_period_outcomes(&mut builder, StandardEventType::MainMatch, &period_with_alt_lines_only());
        let m = builder.build(Utc::now()).unwrap();
        let home_win = m.events[0].outcomes.iter().find(|o| o.outcome_type == OutcomeType::HomeWin).unwrap();
        assert!((home_win.odds - american_to_decimal(-150.0)).abs() < 1e-9);
    }

    fn adapter_with_empty_stores() -> PinnacleAdapter {
        let http = HttpClient::new("pinnacle", None, Some("http://guest.example.com".to_string()), vec![], std::time::Duration::from_secs(5), vec![]);
        let odds_http = HttpClient::new("pinnacle-odds", None, Some("http://odds.example.com".to_string()), vec![], std::time::Duration::from_secs(5), vec![]);
        PinnacleAdapter::new(http, odds_http, Arc::new(MergeStore::new()))
    }

    #[test]
    fn guest_event_without_matching_odds_entry_is_skipped() {
        use crate::adapters::pinnacle::types::{PinnacleGuestEvent, PinnacleGuestLeague, PinnacleGuestLeaguesResponse};

        let start = Utc::now() + chrono::Duration::hours(1);
        let guest = PinnacleGuestLeaguesResponse {
            leagues: vec![PinnacleGuestLeague { name: "EPL".to_string(), events: vec![PinnacleGuestEvent { home: "A".to_string(), away: "B".to_string(), start_time: start, units: None }] }],
        };
        let odds = PinnacleLeaguesResponse { leagues: vec![] };

        let adapter = adapter_with_empty_stores();
        let matches = adapter.build_matches(&guest, &odds, Utc::now());
        assert!(matches.is_empty());
    }

    #[test]
    fn joined_guest_and_odds_events_produce_a_match() {
        use crate::adapters::pinnacle::types::{PinnacleEvent, PinnacleGuestEvent, PinnacleGuestLeague, PinnacleGuestLeaguesResponse, PinnacleLeague};

        let start = Utc::now() + chrono::Duration::hours(1);
        let guest = PinnacleGuestLeaguesResponse {
            leagues: vec![PinnacleGuestLeague { name: "EPL".to_string(), events: vec![PinnacleGuestEvent { home: "A".to_string(), away: "B".to_string(), start_time: start, units: None }] }],
        };
        let odds = PinnacleLeaguesResponse {
            leagues: vec![PinnacleLeague { name: "EPL".to_string(), events: vec![PinnacleEvent { home: "A".to_string(), away: "B".to_string(), start_time: start, periods: vec![period_with_alt_lines_only()] }] }],
        };

        let adapter = adapter_with_empty_stores();
        let matches = adapter.build_matches(&guest, &odds, Utc::now());
        assert_eq!(matches.len(), 1);
    }
}
