use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LeonResponse {
    #[serde(default)]
    pub events: Vec<LeonEvent>,
}

#[derive(Debug, Deserialize)]
pub struct LeonEvent {
    pub competitor1: String,
    pub competitor2: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub markets: Vec<LeonMarket>,
}

#[derive(Debug, Deserialize)]
pub struct LeonMarket {
    pub id: i64,
    #[serde(default)]
    pub param: Option<f64>,
    pub price: f64,
}
