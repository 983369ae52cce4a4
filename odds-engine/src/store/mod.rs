//! In-memory canonical merge store.
//!
//! Two independent instances exist in a running process: one for `Match`,
//! one for `EsportsMatch`. `MergeStore<M>` is generic over the merge unit so
//! both share this implementation rather than being hand-duplicated.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::model::{EsportsMatch, Match};

pub trait Mergeable: Clone {
    fn id(&self) -> &str;
    fn updated_at(&self) -> chrono::DateTime<Utc>;
    fn name_fields(&self) -> (&str, &str, &str);
    /// Merge `other` (incoming) into `self` (existing) per the event/outcome
    /// upsert rule; advances `updated_at`.
    fn merge_from(&mut self, other: Self);
}

pub struct MergeStore<M: Mergeable> {
    entries: RwLock<HashMap<String, M>>,
}

impl<M: Mergeable> Default for MergeStore<M> {
    fn default() -> Self {
        Self { entries: RwLock::new(HashMap::new()) }
    }
}

impl<M: Mergeable> MergeStore<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert keyed by `m.id()`.
    pub fn add(&self, m: M) {
        let mut entries = self.entries.write().unwrap();
        match entries.get_mut(m.id()) {
            Some(existing) => existing.merge_from(m),
            None => {
                entries.insert(m.id().to_string(), m);
            }
        }
    }

    /// Deep-copied snapshot sorted by `updated_at` descending.
    pub fn list(&self) -> Vec<M> {
        let entries = self.entries.read().unwrap();
        let mut out: Vec<M> = entries.values().cloned().collect();
        out.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        out
    }

    /// Case-insensitive substring match over name/home/away/"home - away"/"home vs away".
    pub fn list_by_name(&self, query: &str) -> Vec<M> {
        let needle = query.to_lowercase();
        let entries = self.entries.read().unwrap();
        let mut out: Vec<M> = entries
            .values()
            .filter(|m| {
                let (name, home, away) = m.name_fields();
                let dash = format!("{home} - {away}");
                let vs = format!("{home} vs {away}");
                [name, home, away, dash.as_str(), vs.as_str()].iter().any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        out
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Upsert a collection of externally-sourced slices (orchestrator mode)
    /// through the same merge rule, returning the merged result sorted by
    /// `updated_at` descending.
    pub fn merge_lists(&self, lists: Vec<Vec<M>>) -> Vec<M> {
        for list in lists {
            for m in list {
                self.add(m);
            }
        }
        self.list()
    }
}

impl Mergeable for Match {
    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> chrono::DateTime<Utc> {
        self.updated_at
    }

    fn name_fields(&self) -> (&str, &str, &str) {
        (&self.name, &self.home_team, &self.away_team)
    }

    fn merge_from(&mut self, other: Self) {
        merge_events(self, other);
    }
}

impl Mergeable for EsportsMatch {
    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> chrono::DateTime<Utc> {
        self.updated_at
    }

    fn name_fields(&self) -> (&str, &str, &str) {
        (&self.name, &self.home_team, &self.away_team)
    }

    fn merge_from(&mut self, other: Self) {
        merge_esports_events(self, other);
    }
}

fn merge_events(existing: &mut Match, incoming: Match) {
    for incoming_event in incoming.events {
        match existing.events.iter_mut().find(|e| e.id == incoming_event.id) {
            Some(existing_event) => {
                for incoming_outcome in incoming_event.outcomes {
                    match existing_event.outcomes.iter_mut().find(|o| o.id == incoming_outcome.id) {
                        Some(existing_outcome) => {
                            existing_outcome.odds = incoming_outcome.odds;
                            existing_outcome.updated_at = incoming_outcome.updated_at;
                        }
                        None => existing_event.outcomes.push(incoming_outcome),
                    }
                }
                existing_event.updated_at = incoming_event.updated_at;
            }
            None => existing.events.push(incoming_event),
        }
    }

    if !incoming.name.is_empty() {
        existing.name = incoming.name;
    }
    if !incoming.home_team.is_empty() {
        existing.home_team = incoming.home_team;
    }
    if !incoming.away_team.is_empty() {
        existing.away_team = incoming.away_team;
    }
    if !incoming.bookmaker.is_empty() {
        existing.bookmaker = incoming.bookmaker;
    }
    existing.updated_at = incoming.updated_at;
}

fn merge_esports_events(existing: &mut EsportsMatch, incoming: EsportsMatch) {
    for incoming_event in incoming.markets {
        match existing.markets.iter_mut().find(|e| e.id == incoming_event.id) {
            Some(existing_event) => {
                for incoming_outcome in incoming_event.outcomes {
                    match existing_event.outcomes.iter_mut().find(|o| o.id == incoming_outcome.id) {
                        Some(existing_outcome) => {
                            existing_outcome.odds = incoming_outcome.odds;
                            existing_outcome.updated_at = incoming_outcome.updated_at;
                        }
                        None => existing_event.outcomes.push(incoming_outcome),
                    }
                }
                existing_event.updated_at = incoming_event.updated_at;
            }
            None => existing.markets.push(incoming_event),
        }
    }

    if !incoming.name.is_empty() {
        existing.name = incoming.name;
    }
    if !incoming.home_team.is_empty() {
        existing.home_team = incoming.home_team;
    }
    if !incoming.away_team.is_empty() {
        existing.away_team = incoming.away_team;
    }
    if !incoming.bookmaker.is_empty() {
        existing.bookmaker = incoming.bookmaker;
    }
    existing.updated_at = incoming.updated_at;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchBuilder, OutcomeType, Sport, StandardEventType};
    use chrono::TimeZone;

    fn ts() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 16, 40, 0).unwrap()
    }

    #[test]
    fn add_inserts_new_match() {
        let store: MergeStore<Match> = MergeStore::new();
        let mut builder = MatchBuilder::new("A", "B", ts(), Sport::Football, "League", "fonbet");
        builder.add_outcome(StandardEventType::MainMatch, OutcomeType::HomeWin, "", 2.0);
        let m = builder.build(ts()).unwrap();
        store.add(m.clone());
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].id, m.id);
    }

    #[test]
    fn add_upserts_outcomes_without_duplicating_events() {
        let store: MergeStore<Match> = MergeStore::new();

        let mut first = MatchBuilder::new("A", "B", ts(), Sport::Football, "League", "fonbet");
        first.add_outcome(StandardEventType::MainMatch, OutcomeType::HomeWin, "", 2.0);
        store.add(first.build(ts()).unwrap());

        let later = ts() + chrono::Duration::minutes(5);
        let mut second = MatchBuilder::new("A", "B", ts(), Sport::Football, "League", "fonbet");
        second.add_outcome(StandardEventType::MainMatch, OutcomeType::HomeWin, "", 2.20);
        store.add(second.build(later).unwrap());

        let list = store.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].events.len(), 1);
        assert_eq!(list[0].events[0].outcomes.len(), 1);
        assert_eq!(list[0].events[0].outcomes[0].odds, 2.20);
    }

    #[test]
    fn list_by_name_matches_home_vs_away() {
        let store: MergeStore<Match> = MergeStore::new();
        let mut builder = MatchBuilder::new("Bayern Munich", "Real Madrid", ts(), Sport::Football, "UCL", "fonbet");
        builder.add_outcome(StandardEventType::MainMatch, OutcomeType::HomeWin, "", 2.1);
        store.add(builder.build(ts()).unwrap());

        assert_eq!(store.list_by_name("real madrid").len(), 1);
        assert_eq!(store.list_by_name("bayern munich vs real madrid").len(), 1);
        assert_eq!(store.list_by_name("nonexistent").len(), 0);
    }

    #[test]
    fn clear_drops_all_entries() {
        let store: MergeStore<Match> = MergeStore::new();
        let mut builder = MatchBuilder::new("A", "B", ts(), Sport::Football, "League", "fonbet");
        builder.add_outcome(StandardEventType::MainMatch, OutcomeType::HomeWin, "", 2.0);
        store.add(builder.build(ts()).unwrap());
        store.clear();
        assert!(store.list().is_empty());
    }
}
