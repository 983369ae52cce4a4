//! Fonbet's vendor code tables.

use crate::model::{OutcomeType, Sport, StandardEventType};

/// Hierarchical child event `kind` -> standard event type. Unknown kinds are
/// dropped silently.
pub fn map_event_kind(kind: i64) -> Option<StandardEventType> {
    match kind {
        400100 => Some(StandardEventType::Corners),
        400200 => Some(StandardEventType::YellowCards),
        400300 => Some(StandardEventType::Fouls),
        400400 => Some(StandardEventType::ShotsOnTarget),
        400500 => Some(StandardEventType::Offsides),
        401000 => Some(StandardEventType::ThrowIns),
        _ => None,
    }
}

/// Factor code + raw `pt` parameter -> `(outcome_type, parameter)`. Returns
/// `None` for unrecognized factor codes, which are dropped silently.
pub fn map_factor(factor: i64, pt: Option<f64>) -> Option<(OutcomeType, String)> {
    match factor {
        921 => Some((OutcomeType::HomeWin, String::new())),
        922 => Some((OutcomeType::Draw, String::new())),
        923 => Some((OutcomeType::AwayWin, String::new())),
        930 => Some((OutcomeType::TotalOver, crate::model::format_total_parameter(pt?))),
        931 => Some((OutcomeType::TotalUnder, crate::model::format_total_parameter(pt?))),
        910 | 927 | 989 => Some((OutcomeType::HandicapHome, crate::model::format_handicap_parameter(pt?))),
        912 | 928 | 991 => Some((OutcomeType::HandicapAway, crate::model::format_handicap_parameter(pt?))),
        _ => None,
    }
}

/// Esports category ids map 1:1 to aliases; segments with no category are
/// non-esports by construction.
pub fn esports_alias_for_category(category_id: i64) -> Option<&'static str> {
    match category_id {
        19 => Some("dota2"),
        20 => Some("cs"),
        21 => Some("valorant"),
        22 => Some("lol"),
        78 => Some("kog"),
        148 => Some("crossfire"),
        169 => Some("callofduty"),
        _ => None,
    }
}

/// Top-level sport taxonomy id for team sports this adapter handles.
pub fn sport_category_id(sport: Sport) -> Option<i64> {
    match sport {
        Sport::Football => Some(1),
        Sport::Basketball => Some(2),
        Sport::Tennis => Some(3),
        Sport::Hockey => Some(4),
        Sport::Volleyball => Some(5),
        Sport::Baseball => Some(6),
        _ => None,
    }
}
