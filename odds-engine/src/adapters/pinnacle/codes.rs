//! Pattern-matches a related-matchup's `units`/league name onto the standard
//! event vocabulary.

use crate::model::StandardEventType;

pub fn map_related_matchup(units_or_league: &str) -> Option<StandardEventType> {
    let lower = units_or_league.to_lowercase();
    if lower.contains("corner") {
        Some(StandardEventType::Corners)
    } else if lower.contains("booking") || lower.contains("card") {
        Some(StandardEventType::YellowCards)
    } else if lower.contains("foul") {
        Some(StandardEventType::Fouls)
    } else if lower.contains("shot") {
        Some(StandardEventType::ShotsOnTarget)
    } else if lower.contains("offside") {
        Some(StandardEventType::Offsides)
    } else if lower.contains("throw") {
        Some(StandardEventType::ThrowIns)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_corners_units() {
        assert_eq!(map_related_matchup("Corners"), Some(StandardEventType::Corners));
    }

    #[test]
    fn matches_bookings_as_yellow_cards() {
        assert_eq!(map_related_matchup("Team Bookings"), Some(StandardEventType::YellowCards));
    }

    #[test]
    fn unrecognized_units_are_dropped() {
        assert_eq!(map_related_matchup("Corner Kicks First Half Alt"), Some(StandardEventType::Corners));
        assert_eq!(map_related_matchup("Player Props"), None);
    }
}
