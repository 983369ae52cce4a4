//! 1xbet adapter — generic pipeline shape.

pub mod types;

use chrono::Utc;

use crate::adapters::generic::{GenericVendorAdapter, VendorParser};
use crate::adapters::passes_match_filter;
use crate::model::{Match, MatchBuilder, OutcomeType, Sport, StandardEventType};

use self::types::{OnexbetGame, OnexbetResponse};

pub type OnexbetAdapter = GenericVendorAdapter<OnexbetResponse, OnexbetCodeMap>;

pub struct OnexbetCodeMap {
    pub sport: Sport,
}

impl OnexbetCodeMap {
    pub fn new(sport: Sport) -> Self {
        Self { sport }
    }

    fn map_game(&self, game: &OnexbetGame, now: chrono::DateTime<Utc>) -> Option<Match> {
        if game.sport_id != onexbet_sport_id(self.sport)? {
            return None;
        }
        if !passes_match_filter(&game.team1, &game.team2, &game.league, game.start_time, now) {
            return None;
        }

        let mut builder = MatchBuilder::new(game.team1.clone(), game.team2.clone(), game.start_time, self.sport, game.league.clone(), "1xbet");

        for market in &game.markets {
            let Some((outcome_type, parameter)) = map_market(market.type_id, market.param) else { continue };
            builder.add_outcome(StandardEventType::MainMatch, outcome_type, parameter, market.coefficient);
        }

        builder.build(now)
    }
}

fn onexbet_sport_id(sport: Sport) -> Option<i64> {
    match sport {
        Sport::Football => Some(1),
        Sport::Basketball => Some(3),
        Sport::Tennis => Some(2),
        Sport::Hockey => Some(4),
        _ => None,
    }
}

fn map_market(type_id: i64, param: Option<f64>) -> Option<(OutcomeType, String)> {
    match type_id {
        1 => Some((OutcomeType::HomeWin, String::new())),
        2 => Some((OutcomeType::Draw, String::new())),
        3 => Some((OutcomeType::AwayWin, String::new())),
        9 => Some((OutcomeType::TotalOver, crate::model::format_total_parameter(param?))),
        10 => Some((OutcomeType::TotalUnder, crate::model::format_total_parameter(param?))),
        7 => Some((OutcomeType::HandicapHome, crate::model::format_handicap_parameter(param?))),
        8 => Some((OutcomeType::HandicapAway, crate::model::format_handicap_parameter(param?))),
        _ => None,
    }
}

impl VendorParser<OnexbetResponse> for OnexbetCodeMap {
    fn build_matches(&self, response: &OnexbetResponse, now: chrono::DateTime<Utc>) -> Vec<Match> {
        response.games.iter().filter_map(|g| self.map_game(g, now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_market_type_is_dropped() {
        assert_eq!(map_market(999, None), None);
    }

    #[test]
    fn moneyline_market_maps() {
        assert_eq!(map_market(1, None), Some((OutcomeType::HomeWin, String::new())));
    }
}
