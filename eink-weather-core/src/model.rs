use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A zip code resolved by the geocoding endpoint. Only lives for the duration
/// of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub zip: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
}

/// One entry of the provider's `weather[]` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    /// Short category label, e.g. "Clear".
    pub main: String,
    pub description: String,
    /// Key into the icon tables, e.g. "01d".
    pub icon: String,
}

/// The result of one successful fetch.
///
/// A snapshot is never edited after it is built; a refresh produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub conditions: Vec<Condition>,
    pub temperature_c: f64,
    pub humidity_pct: i32,
    pub wind_speed_mps: f64,
    pub wind_deg: f64,
    pub pressure_hpa: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub location_name: String,
    pub country: String,
    pub status_code: i64,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// The condition used for display. Only the first entry is ever shown.
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }

    /// Icon code of the primary condition, or an empty string when the
    /// provider sent no conditions.
    pub fn icon_code(&self) -> &str {
        self.primary_condition()
            .map(|c| c.icon.as_str())
            .unwrap_or("")
    }
}

/// What the display should currently show.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Loading,
    Success(WeatherSnapshot),
    Error(String),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            UiState::Success(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
