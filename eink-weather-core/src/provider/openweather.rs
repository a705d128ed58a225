use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::{
    config::Config,
    error::{RequestStage, WeatherError},
    model::{Condition, Location, WeatherSnapshot},
};

use super::WeatherProvider;

/// OpenWeather client: geocode the zip code, then fetch current conditions
/// for the resolved coordinates.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// `timeout` bounds the connect and read phases individually; the whole
    /// request is additionally capped at three times that.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let total = timeout.checked_mul(3).ok_or_else(|| {
            WeatherError::Client(format!("timeout of {}s is too large", timeout.as_secs()))
        })?;

        let http = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .timeout(total)
            .build()
            .map_err(|e| WeatherError::Client(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    async fn geocode(&self, zip: &str, api_key: &str) -> Result<Location, WeatherError> {
        let url = format!("{}/geo/1.0/zip", self.base_url);
        debug!(%url, "requesting zip code lookup");

        let res = self
            .http
            .get(&url)
            .query(&[("zip", zip), ("appid", api_key)])
            .send()
            .await
            .map_err(|e| transport_error(e, RequestStage::Geocode, zip))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| transport_error(e, RequestStage::Geocode, zip))?;

        if !status.is_success() {
            return Err(WeatherError::lookup(
                zip,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        let parsed: OwZipResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::lookup(zip, format!("unexpected response: {e}")))?;

        let (Some(latitude), Some(longitude)) = (parsed.lat, parsed.lon) else {
            return Err(WeatherError::lookup(zip, "response did not contain coordinates"));
        };

        Ok(Location {
            zip: parsed.zip.unwrap_or_else(|| zip.to_string()),
            name: parsed.name.unwrap_or_default(),
            latitude,
            longitude,
            country: parsed.country.unwrap_or_default(),
        })
    }

    async fn current_conditions(
        &self,
        location: &Location,
        api_key: &str,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();
        debug!(%url, %lat, %lon, "requesting current conditions");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| transport_error(e, RequestStage::Conditions, &location.zip))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| transport_error(e, RequestStage::Conditions, &location.zip))?;

        if !status.is_success() {
            return Err(WeatherError::Fetch(format!(
                "status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Fetch(format!("unexpected response: {e}")))?;

        Ok(parsed.into_snapshot(location))
    }
}

#[derive(Debug, Deserialize)]
struct OwZipResponse {
    zip: Option<String>,
    name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWeather {
    id: i64,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    pressure: f64,
    #[serde(default)]
    humidity: i32,
    #[serde(default)]
    temp_min: f64,
    #[serde(default)]
    temp_max: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWind {
    speed: f64,
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    weather: Vec<OwWeather>,
    main: OwMain,
    #[serde(default)]
    wind: OwWind,
    name: String,
    #[serde(default)]
    cod: i64,
}

impl OwCurrentResponse {
    fn into_snapshot(self, location: &Location) -> WeatherSnapshot {
        WeatherSnapshot {
            conditions: self
                .weather
                .into_iter()
                .map(|w| Condition {
                    id: w.id,
                    main: w.main,
                    description: w.description,
                    icon: w.icon,
                })
                .collect(),
            temperature_c: self.main.temp,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            wind_deg: self.wind.deg,
            pressure_hpa: self.main.pressure,
            temp_min_c: self.main.temp_min,
            temp_max_c: self.main.temp_max,
            location_name: self.name,
            country: location.country.clone(),
            status_code: self.cod,
            fetched_at: Utc::now(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, api_key))]
    async fn fetch_by_zip(
        &self,
        zip: &str,
        api_key: &str,
    ) -> Result<WeatherSnapshot, WeatherError> {
        if zip.trim().is_empty() {
            return Err(WeatherError::lookup(zip, "zip code is empty"));
        }

        let location = self.geocode(zip, api_key).await?;
        info!(
            place = %location.name,
            country = %location.country,
            lat = location.latitude,
            lon = location.longitude,
            "resolved zip code"
        );

        self.current_conditions(&location, api_key).await
    }
}

fn transport_error(err: reqwest::Error, stage: RequestStage, zip: &str) -> WeatherError {
    if err.is_timeout() {
        return WeatherError::Timeout(stage);
    }

    match stage {
        RequestStage::Geocode => WeatherError::lookup(zip, err.to_string()),
        RequestStage::Conditions => WeatherError::Fetch(err.to_string()),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
