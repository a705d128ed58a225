use std::fmt;

use thiserror::Error;

/// Which leg of a zip-code fetch a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Geocode,
    Conditions,
}

impl RequestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStage::Geocode => "geocode",
            RequestStage::Conditions => "current conditions",
        }
    }
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures raised by a [`WeatherProvider`](crate::WeatherProvider).
///
/// The state machine collapses every variant into a single error message, so
/// the distinction only shows up in the text the user reads.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The zip code could not be resolved to coordinates.
    #[error("Could not find location for zip code '{zip}': {reason}")]
    Lookup { zip: String, reason: String },

    /// Current conditions could not be fetched after a successful geocode.
    #[error("Failed to fetch current weather: {0}")]
    Fetch(String),

    /// One of the two requests exceeded its time budget.
    #[error("The {0} request timed out")]
    Timeout(RequestStage),

    /// The HTTP client could not be built.
    #[error("Failed to initialise HTTP client: {0}")]
    Client(String),
}

impl WeatherError {
    pub(crate) fn lookup(zip: &str, reason: impl Into<String>) -> Self {
        WeatherError::Lookup {
            zip: zip.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, WeatherError::Timeout(_))
    }
}
