use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OlimpResponse {
    #[serde(default)]
    pub events: Vec<OlimpEvent>,
}

#[derive(Debug, Deserialize)]
pub struct OlimpEvent {
    #[serde(rename = "homeTeam")]
    pub home_team: String,
    #[serde(rename = "awayTeam")]
    pub away_team: String,
    pub kickoff: DateTime<Utc>,
    #[serde(default)]
    pub tournament: String,
    #[serde(default)]
    pub quotes: Vec<OlimpQuote>,
}

#[derive(Debug, Deserialize)]
pub struct OlimpQuote {
    pub code: String,
    #[serde(default)]
    pub line: Option<f64>,
    pub price: f64,
}
