//! Display strings derived from a snapshot.

use crate::{
    icons::{IconSet, icon_asset_path},
    model::WeatherSnapshot,
};

/// Everything the weather screen prints for a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub temperature: String,
    pub description: String,
    pub humidity: String,
    pub wind: String,
    pub location: String,
    pub icon_path: String,
}

impl WeatherView {
    pub fn new(snapshot: &WeatherSnapshot, icon_set: IconSet) -> Self {
        let description = snapshot
            .primary_condition()
            .map(|c| c.description.to_uppercase())
            .unwrap_or_default();

        Self {
            temperature: format!("{}°C", round_half_up(snapshot.temperature_c)),
            description,
            humidity: format!("Humidity: {}%", snapshot.humidity_pct),
            // Debug keeps the decimal on whole speeds: 3.0 stays "3.0".
            wind: format!("Wind: {:?} m/s", snapshot.wind_speed_mps),
            location: snapshot.location_name.clone(),
            icon_path: icon_asset_path(snapshot.icon_code(), icon_set),
        }
    }
}

/// Nearest integer, ties towards positive infinity (`-2.5` becomes `-2`).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
