//! Raw Fonbet wire shapes — deserialized as-is, translated by `codes.rs`.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FonbetResponse {
    pub events: Vec<FonbetEvent>,
    #[serde(rename = "customFactors")]
    pub custom_factors: Vec<FonbetCustomFactor>,
}

#[derive(Debug, Deserialize)]
pub struct FonbetEvent {
    pub id: i64,
    pub level: i32,
    #[serde(rename = "parentId")]
    pub parent_id: Option<i64>,
    pub kind: i64,
    pub name: String,
    pub team1: String,
    pub team2: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "leagueName", default)]
    pub league_name: String,
    #[serde(rename = "sportCategoryId")]
    pub sport_category_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FonbetCustomFactor {
    #[serde(rename = "eventId")]
    pub event_id: i64,
    pub factor: i64,
    pub value: f64,
    #[serde(default, rename = "pt")]
    pub param: Option<f64>,
}
