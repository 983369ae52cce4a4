//! The closed canonical vocabularies every vendor adapter maps onto.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical sport/discipline alias. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Football,
    Basketball,
    Tennis,
    Hockey,
    Volleyball,
    Baseball,
    Dota2,
    Cs,
    Valorant,
    Lol,
    Kog,
    Crossfire,
    Callofduty,
}

impl Sport {
    pub const ALL: &'static [Sport] = &[
        Sport::Football,
        Sport::Basketball,
        Sport::Tennis,
        Sport::Hockey,
        Sport::Volleyball,
        Sport::Baseball,
        Sport::Dota2,
        Sport::Cs,
        Sport::Valorant,
        Sport::Lol,
        Sport::Kog,
        Sport::Crossfire,
        Sport::Callofduty,
    ];

    /// Esports disciplines live in a separate universe (separate store).
    pub fn is_esport(self) -> bool {
        matches!(
            self,
            Sport::Dota2 | Sport::Cs | Sport::Valorant | Sport::Lol | Sport::Kog | Sport::Crossfire | Sport::Callofduty
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Football => "football",
            Sport::Basketball => "basketball",
            Sport::Tennis => "tennis",
            Sport::Hockey => "hockey",
            Sport::Volleyball => "volleyball",
            Sport::Baseball => "baseball",
            Sport::Dota2 => "dota2",
            Sport::Cs => "cs",
            Sport::Valorant => "valorant",
            Sport::Lol => "lol",
            Sport::Kog => "kog",
            Sport::Crossfire => "crossfire",
            Sport::Callofduty => "callofduty",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownSport;

impl FromStr for Sport {
    type Err = UnknownSport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sport::ALL
            .iter()
            .copied()
            .find(|sport| sport.as_str() == s)
            .ok_or(UnknownSport)
    }
}

/// Standard event type: one (bookmaker, market-family) slice of a Match.
/// Closed but extensible set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardEventType {
    MainMatch,
    Corners,
    YellowCards,
    Fouls,
    ShotsOnTarget,
    Offsides,
    ThrowIns,
}

impl StandardEventType {
    pub const ALL: &'static [StandardEventType] = &[
        StandardEventType::MainMatch,
        StandardEventType::Corners,
        StandardEventType::YellowCards,
        StandardEventType::Fouls,
        StandardEventType::ShotsOnTarget,
        StandardEventType::Offsides,
        StandardEventType::ThrowIns,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StandardEventType::MainMatch => "main_match",
            StandardEventType::Corners => "corners",
            StandardEventType::YellowCards => "yellow_cards",
            StandardEventType::Fouls => "fouls",
            StandardEventType::ShotsOnTarget => "shots_on_target",
            StandardEventType::Offsides => "offsides",
            StandardEventType::ThrowIns => "throw_ins",
        }
    }

    /// Human-readable market label for this event type.
    pub fn market_name(self) -> &'static str {
        match self {
            StandardEventType::MainMatch => "Match Result",
            StandardEventType::Corners => "Corners",
            StandardEventType::YellowCards => "Yellow Cards",
            StandardEventType::Fouls => "Fouls",
            StandardEventType::ShotsOnTarget => "Shots on Target",
            StandardEventType::Offsides => "Offsides",
            StandardEventType::ThrowIns => "Throw-Ins",
        }
    }
}

impl fmt::Display for StandardEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StandardEventType {
    type Err = UnknownSport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StandardEventType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or(UnknownSport)
    }
}

/// Closed outcome vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeType {
    HomeWin,
    Draw,
    AwayWin,
    TotalOver,
    TotalUnder,
    HandicapHome,
    HandicapAway,
    AltTotalOver,
    AltTotalUnder,
    ExactCount,
}

impl OutcomeType {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeType::HomeWin => "home_win",
            OutcomeType::Draw => "draw",
            OutcomeType::AwayWin => "away_win",
            OutcomeType::TotalOver => "total_over",
            OutcomeType::TotalUnder => "total_under",
            OutcomeType::HandicapHome => "handicap_home",
            OutcomeType::HandicapAway => "handicap_away",
            OutcomeType::AltTotalOver => "alt_total_over",
            OutcomeType::AltTotalUnder => "alt_total_under",
            OutcomeType::ExactCount => "exact_count",
        }
    }

    /// A handicap/total parameter string classifies by its sign, never by magnitude:
    /// leading `+`/`-` means handicap, otherwise (unsigned decimal) it's a total.
    pub fn is_handicap(self) -> bool {
        matches!(self, OutcomeType::HandicapHome | OutcomeType::HandicapAway)
    }

    pub fn is_total(self) -> bool {
        matches!(
            self,
            OutcomeType::TotalOver | OutcomeType::TotalUnder | OutcomeType::AltTotalOver | OutcomeType::AltTotalUnder
        )
    }
}

impl fmt::Display for OutcomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a handicap parameter: signed, no trailing zeros beyond what's
/// needed, `+`/`-` always present.
pub fn format_handicap_parameter(value: f64) -> String {
    let magnitude = format_trimmed(value.abs());
    if value < 0.0 {
        format!("-{magnitude}")
    } else {
        format!("+{magnitude}")
    }
}

/// Format a total-line parameter: unsigned decimal string, e.g. "2.5".
pub fn format_total_parameter(value: f64) -> String {
    format_trimmed(value.abs())
}

fn format_trimmed(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let s = format!("{value}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
