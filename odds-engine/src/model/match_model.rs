//! Canonical `Match -> Event -> Outcome` model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::canonical_id::{canonical_match_id, match_display_name};
use super::vocabulary::{OutcomeType, Sport, StandardEventType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: String,
    pub event_id: String,
    pub outcome_type: OutcomeType,
    /// Empty for 1X2, signed for handicaps, unsigned decimal for totals.
    pub parameter: String,
    pub odds: f64,
    pub bookmaker: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Outcome {
    pub fn key(&self) -> (OutcomeType, String) {
        (self.outcome_type, self.parameter.clone())
    }
}

/// `id = eventID + "_" + outcomeType + "_" + parameter`.
pub fn outcome_id(event_id: &str, outcome_type: OutcomeType, parameter: &str) -> String {
    format!("{event_id}_{outcome_type}_{parameter}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub match_id: String,
    pub event_type: StandardEventType,
    pub market_name: String,
    pub bookmaker: String,
    pub outcomes: Vec<Outcome>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn key(&self) -> (String, StandardEventType) {
        (self.bookmaker.clone(), self.event_type)
    }
}

/// `id = matchID + "_" + bookmakerKey + "_" + eventType`.
pub fn event_id(match_id: &str, bookmaker: &str, event_type: StandardEventType) -> String {
    format!("{match_id}_{bookmaker}_{event_type}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub name: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    pub sport: Sport,
    pub tournament: String,
    /// Empty at Match level; contributing bookmakers are recorded on Events.
    pub bookmaker: String,
    pub events: Vec<Event>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Builder used by every adapter's `build` step.
///
/// `outcomes` is keyed `(standard_event_type, bookmaker, outcome_type, parameter, odds)`.
/// An event with zero outcomes is dropped: an event is stored only if it has
/// at least one outcome.
pub struct MatchBuilder {
    home_team: String,
    away_team: String,
    start_time: DateTime<Utc>,
    sport: Sport,
    tournament: String,
    bookmaker: String,
    events: BTreeMap<StandardEventType, Vec<(OutcomeType, String, f64)>>,
}

impl MatchBuilder {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>, start_time: DateTime<Utc>, sport: Sport, tournament: impl Into<String>, bookmaker: impl Into<String>) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            start_time,
            sport,
            tournament: tournament.into(),
            bookmaker: bookmaker.into(),
            events: BTreeMap::new(),
        }
    }

    pub fn add_outcome(&mut self, event_type: StandardEventType, outcome_type: OutcomeType, parameter: impl Into<String>, odds: f64) -> &mut Self {
        self.events.entry(event_type).or_default().push((outcome_type, parameter.into(), odds));
        self
    }

    pub fn has_outcomes(&self) -> bool {
        self.events.values().any(|v| !v.is_empty())
    }

    /// Build the canonical `Match`. Returns `None` if no event ended up with
    /// any outcomes (nothing worth storing).
    pub fn build(self, now: DateTime<Utc>) -> Option<Match> {
        if !self.has_outcomes() {
            return None;
        }

        let match_id = canonical_match_id(&self.home_team, &self.away_team, self.start_time);
        let name = match_display_name(&self.home_team, &self.away_team);

        let mut events = Vec::new();
        for (event_type, outcomes) in self.events {
            if outcomes.is_empty() {
                continue;
            }
            let eid = event_id(&match_id, &self.bookmaker, event_type);
            let built_outcomes: Vec<Outcome> = outcomes
                .into_iter()
                .map(|(outcome_type, parameter, odds)| Outcome {
                    id: outcome_id(&eid, outcome_type, &parameter),
                    event_id: eid.clone(),
                    outcome_type,
                    parameter,
                    odds,
                    bookmaker: self.bookmaker.clone(),
                    created_at: now,
                    updated_at: now,
                })
                .collect();

            events.push(Event {
                id: eid,
                match_id: match_id.clone(),
                event_type,
                market_name: event_type.market_name().to_string(),
                bookmaker: self.bookmaker.clone(),
                outcomes: built_outcomes,
                created_at: now,
                updated_at: now,
            });
        }

        Some(Match {
            id: match_id,
            name,
            home_team: self.home_team,
            away_team: self.away_team,
            start_time: self.start_time,
            sport: self.sport,
            tournament: self.tournament,
            bookmaker: String::new(),
            events,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Mirrors `Match` but lives in a separate universe (`discipline`/`markets`
/// instead of `sport`/`events`) so esports odds never leak into the football
/// view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsportsMatch {
    pub id: String,
    pub name: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    pub discipline: Sport,
    pub tournament: String,
    pub bookmaker: String,
    pub markets: Vec<Event>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct EsportsMatchBuilder(MatchBuilder);

impl EsportsMatchBuilder {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>, start_time: DateTime<Utc>, discipline: Sport, tournament: impl Into<String>, bookmaker: impl Into<String>) -> Self {
        Self(MatchBuilder::new(home_team, away_team, start_time, discipline, tournament, bookmaker))
    }

    pub fn add_outcome(&mut self, event_type: StandardEventType, outcome_type: OutcomeType, parameter: impl Into<String>, odds: f64) -> &mut Self {
        self.0.add_outcome(event_type, outcome_type, parameter, odds);
        self
    }

    pub fn build(self, now: DateTime<Utc>) -> Option<EsportsMatch> {
        let m = self.0.build(now)?;
        Some(EsportsMatch {
            id: m.id,
            name: m.name,
            home_team: m.home_team,
            away_team: m.away_team,
            start_time: m.start_time,
            discipline: m.sport,
            tournament: m.tournament,
            bookmaker: m.bookmaker,
            markets: m.events,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 16, 40, 0).unwrap()
    }

    #[test]
    fn builder_drops_events_without_outcomes() {
        let builder = MatchBuilder::new("A", "B", ts(), Sport::Football, "League", "fonbet");
        assert!(builder.build(ts()).is_none());
    }

    #[test]
    fn builder_produces_full_match_event_with_five_outcomes() {
        let mut builder = MatchBuilder::new("Bayern Munich", "Real Madrid", ts(), Sport::Football, "UCL", "fonbet");
        builder
            .add_outcome(StandardEventType::MainMatch, OutcomeType::HomeWin, "", 2.10)
            .add_outcome(StandardEventType::MainMatch, OutcomeType::Draw, "", 3.40)
            .add_outcome(StandardEventType::MainMatch, OutcomeType::AwayWin, "", 3.30)
            .add_outcome(StandardEventType::MainMatch, OutcomeType::TotalOver, "2.5", 1.90)
            .add_outcome(StandardEventType::MainMatch, OutcomeType::TotalUnder, "2.5", 1.95);

        let m = builder.build(ts()).unwrap();
        assert_eq!(m.events.len(), 1);
        assert_eq!(m.events[0].outcomes.len(), 5);
        assert_eq!(m.bookmaker, "");
        assert_eq!(m.events[0].bookmaker, "fonbet");
    }
}
