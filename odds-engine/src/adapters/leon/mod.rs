//! Leon adapter — generic pipeline shape.

pub mod types;

use chrono::Utc;

use crate::adapters::generic::{GenericVendorAdapter, VendorParser};
use crate::adapters::passes_match_filter;
use crate::model::{Match, MatchBuilder, OutcomeType, StandardEventType};

use self::types::{LeonEvent, LeonResponse};

pub type LeonAdapter = GenericVendorAdapter<LeonResponse, LeonCodeMap>;

#[derive(Default)]
pub struct LeonCodeMap;

fn map_market_id(market_id: i64, param: Option<f64>) -> Option<(OutcomeType, String)> {
    match market_id {
        1 => Some((OutcomeType::HomeWin, String::new())),
        2 => Some((OutcomeType::Draw, String::new())),
        3 => Some((OutcomeType::AwayWin, String::new())),
        4 => Some((OutcomeType::TotalOver, crate::model::format_total_parameter(param?))),
        5 => Some((OutcomeType::TotalUnder, crate::model::format_total_parameter(param?))),
        6 => Some((OutcomeType::HandicapHome, crate::model::format_handicap_parameter(param?))),
        7 => Some((OutcomeType::HandicapAway, crate::model::format_handicap_parameter(param?))),
        _ => None,
    }
}

impl VendorParser<LeonResponse> for LeonCodeMap {
    fn build_matches(&self, response: &LeonResponse, now: chrono::DateTime<Utc>) -> Vec<Match> {
        response
            .events
            .iter()
            .filter(|e| passes_match_filter(&e.competitor1, &e.competitor2, &e.league, e.start_time, now))
            .filter_map(|e| build_match(e, now))
            .collect()
    }
}

fn build_match(event: &LeonEvent, now: chrono::DateTime<Utc>) -> Option<Match> {
    let mut builder = MatchBuilder::new(event.competitor1.clone(), event.competitor2.clone(), event.start_time, crate::model::Sport::Football, event.league.clone(), "leon");

    for market in &event.markets {
        if let Some((outcome_type, parameter)) = map_market_id(market.id, market.param) {
            builder.add_outcome(StandardEventType::MainMatch, outcome_type, parameter, market.price);
        }
    }

    builder.build(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_market_id_is_dropped() {
        assert_eq!(map_market_id(42, None), None);
    }
}
