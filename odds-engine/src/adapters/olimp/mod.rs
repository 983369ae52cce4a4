//! Olimp adapter — generic pipeline shape.

pub mod types;

use chrono::Utc;

use crate::adapters::generic::{GenericVendorAdapter, VendorParser};
use crate::adapters::passes_match_filter;
use crate::model::{Match, MatchBuilder, OutcomeType, StandardEventType};

use self::types::{OlimpEvent, OlimpResponse};

pub type OlimpAdapter = GenericVendorAdapter<OlimpResponse, OlimpCodeMap>;

#[derive(Default)]
pub struct OlimpCodeMap;

fn map_market_code(code: &str, param: Option<f64>) -> Option<(OutcomeType, String)> {
    match code {
        "1" => Some((OutcomeType::HomeWin, String::new())),
        "X" => Some((OutcomeType::Draw, String::new())),
        "2" => Some((OutcomeType::AwayWin, String::new())),
        "TO" => Some((OutcomeType::TotalOver, crate::model::format_total_parameter(param?))),
        "TU" => Some((OutcomeType::TotalUnder, crate::model::format_total_parameter(param?))),
        "H1" => Some((OutcomeType::HandicapHome, crate::model::format_handicap_parameter(param?))),
        "H2" => Some((OutcomeType::HandicapAway, crate::model::format_handicap_parameter(param?))),
        _ => None,
    }
}

impl VendorParser<OlimpResponse> for OlimpCodeMap {
    fn build_matches(&self, response: &OlimpResponse, now: chrono::DateTime<Utc>) -> Vec<Match> {
        response
            .events
            .iter()
            .filter(|e| passes_match_filter(&e.home_team, &e.away_team, &e.tournament, e.kickoff, now))
            .filter_map(|e| build_match(e, now))
            .collect()
    }
}

fn build_match(event: &OlimpEvent, now: chrono::DateTime<Utc>) -> Option<Match> {
    let mut builder = MatchBuilder::new(event.home_team.clone(), event.away_team.clone(), event.kickoff, crate::model::Sport::Football, event.tournament.clone(), "olimp");

    for quote in &event.quotes {
        if let Some((outcome_type, parameter)) = map_market_code(&quote.code, quote.line) {
            builder.add_outcome(StandardEventType::MainMatch, outcome_type, parameter, quote.price);
        }
    }

    builder.build(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_is_dropped() {
        assert_eq!(map_market_code("ZZZ", None), None);
    }

    #[test]
    fn draw_code_maps() {
        assert_eq!(map_market_code("X", None), Some((OutcomeType::Draw, String::new())));
    }
}
