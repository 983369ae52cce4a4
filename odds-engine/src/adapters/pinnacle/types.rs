//! Raw Pinnacle wire shapes: one pair per host.
//!
//! The guest API (primary, static host) enumerates the leagues and events on
//! offer. The odds endpoint (distinct, dynamically-resolved host) carries
//! the actual quotes for those same (league, event) pairs. Matching joins
//! the two on league name + home/away/start time.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PinnacleGuestLeaguesResponse {
    pub leagues: Vec<PinnacleGuestLeague>,
}

#[derive(Debug, Deserialize)]
pub struct PinnacleGuestLeague {
    pub name: String,
    pub events: Vec<PinnacleGuestEvent>,
}

#[derive(Debug, Deserialize)]
pub struct PinnacleGuestEvent {
    pub home: String,
    pub away: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    /// "Corners", "Bookings", etc — pattern-matched against event vocabulary
    /// when this event is itself a related-matchups statistical market.
    #[serde(default)]
    pub units: Option<String>,
}

/// The odds-endpoint response, keyed by the same league/event identity as
/// the guest listing.
#[derive(Debug, Deserialize)]
pub struct PinnacleLeaguesResponse {
    pub leagues: Vec<PinnacleLeague>,
}

#[derive(Debug, Deserialize)]
pub struct PinnacleLeague {
    pub name: String,
    pub events: Vec<PinnacleEvent>,
}

#[derive(Debug, Deserialize)]
pub struct PinnacleEvent {
    pub home: String,
    pub away: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    pub periods: Vec<PinnaclePeriod>,
}

#[derive(Debug, Deserialize)]
pub struct PinnaclePeriod {
    /// "0" is the full match.
    pub number: String,
    #[serde(rename = "moneyLine")]
    pub money_line: Option<PinnacleMoneyLine>,
    #[serde(default)]
    pub handicap: Vec<PinnacleHandicapLine>,
    #[serde(rename = "overUnder", default)]
    pub over_under: Vec<PinnacleTotalLine>,
    #[serde(rename = "indexMainLineHdp", default)]
    pub index_main_line_hdp: Option<usize>,
    #[serde(rename = "indexMainLineOU", default)]
    pub index_main_line_ou: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PinnacleMoneyLine {
    pub home: f64,
    pub draw: Option<f64>,
    pub away: f64,
}

#[derive(Debug, Deserialize)]
pub struct PinnacleHandicapLine {
    pub home: f64,
    pub away: f64,
    #[serde(rename = "hdp")]
    pub points: f64,
}

#[derive(Debug, Deserialize)]
pub struct PinnacleTotalLine {
    pub over: f64,
    pub under: f64,
    pub points: f64,
}
