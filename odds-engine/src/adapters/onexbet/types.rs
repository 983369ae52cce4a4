use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OnexbetResponse {
    #[serde(rename = "Value", default)]
    pub games: Vec<OnexbetGame>,
}

#[derive(Debug, Deserialize)]
pub struct OnexbetGame {
    #[serde(rename = "SportId")]
    pub sport_id: i64,
    #[serde(rename = "LeagueName", default)]
    pub league: String,
    #[serde(rename = "Team1")]
    pub team1: String,
    #[serde(rename = "Team2")]
    pub team2: String,
    #[serde(rename = "StartTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "Markets", default)]
    pub markets: Vec<OnexbetMarket>,
}

#[derive(Debug, Deserialize)]
pub struct OnexbetMarket {
    #[serde(rename = "TypeId")]
    pub type_id: i64,
    #[serde(default)]
    pub param: Option<f64>,
    #[serde(rename = "Coefficient")]
    pub coefficient: f64,
}
