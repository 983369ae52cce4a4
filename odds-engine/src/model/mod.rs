pub mod canonical_id;
pub mod match_model;
pub mod vocabulary;

pub use canonical_id::{canonical_match_id, normalize_team_name};
pub use match_model::{event_id, outcome_id, EsportsMatch, EsportsMatchBuilder, Event, Match, MatchBuilder, Outcome};
pub use vocabulary::{format_handicap_parameter, format_total_parameter, OutcomeType, Sport, StandardEventType};

/// American → decimal odds conversion:
/// positive → `1 + a/100`; negative → `1 + 100/|a|`.
pub fn american_to_decimal(american: f64) -> f64 {
    if american >= 0.0 {
        1.0 + american / 100.0
    } else {
        1.0 + 100.0 / american.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn american_conversion_matches_formula() {
        assert!((american_to_decimal(150.0) - 2.5).abs() < 1e-9);
        assert!((american_to_decimal(-200.0) - 1.5).abs() < 1e-9);
        assert!((american_to_decimal(100.0) - 2.0).abs() < 1e-9);
    }
}
