use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::WeatherError, model::WeatherSnapshot};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Turns a zip code into a [`WeatherSnapshot`].
///
/// Implementations perform no retries; the caller owns retry policy.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_by_zip(&self, zip: &str, api_key: &str)
    -> Result<WeatherSnapshot, WeatherError>;
}
