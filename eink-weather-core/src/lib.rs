//! Core library for the e-ink weather display.
//!
//! This crate defines:
//! - Configuration and durable user preferences
//! - The OpenWeather client (zip code lookup + current conditions)
//! - Shared domain models (snapshots, display state)
//! - The display state machine and its periodic refresh loop
//!
//! It is used by `eink-weather`, but any front-end that can render a
//! [`UiState`] can drive it.

pub mod config;
pub mod error;
pub mod icons;
pub mod model;
pub mod preferences;
pub mod provider;
pub mod state;
pub mod view;

pub use config::Config;
pub use error::{RequestStage, WeatherError};
pub use icons::{IconSet, icon_asset_path, resolve_icon_asset};
pub use model::{Condition, Location, UiState, WeatherSnapshot};
pub use preferences::{DEFAULT_ZIP_CODE, PreferenceStore, UserPreferences};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use state::{RefreshScheduler, WeatherStateMachine};
pub use view::WeatherView;
