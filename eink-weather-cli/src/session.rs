use std::sync::Arc;

use anyhow::Result;
use eink_weather_core::{
    Config, IconSet, OpenWeatherProvider, PreferenceStore, UserPreferences, WeatherStateMachine,
};
use tracing::warn;

/// Everything a display command needs: config, credentials, preferences and
/// the state machine wired to the OpenWeather client.
pub struct Session {
    pub config: Config,
    pub api_key: String,
    pub store: PreferenceStore,
    pub prefs: UserPreferences,
    pub machine: Arc<WeatherStateMachine>,
}

impl Session {
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let api_key = config.resolve_api_key()?;
        let store = PreferenceStore::open_default()?;
        let prefs = store.load();

        let provider = OpenWeatherProvider::from_config(&config)?;
        let machine = Arc::new(WeatherStateMachine::new(Arc::new(provider)));

        Ok(Self {
            config,
            api_key,
            store,
            prefs,
            machine,
        })
    }

    /// Use `zip` if one was given, remembering it, otherwise the last one used.
    pub fn select_zip(&mut self, zip: Option<String>) -> String {
        match zip
            .map(|z| z.trim().to_string())
            .filter(|z| !z.is_empty())
        {
            Some(zip) => {
                self.remember_zip(&zip);
                zip
            }
            None => self.prefs.last_zip_code.clone(),
        }
    }

    pub fn remember_zip(&mut self, zip: &str) {
        if let Err(err) = self.store.save_zip_code(zip) {
            warn!(error = %err, "could not save zip code");
        }
        self.prefs.last_zip_code = zip.to_string();
    }

    pub fn toggle_icon_set(&mut self) -> IconSet {
        let next = self.prefs.icon_set().toggled();
        if let Err(err) = self.store.save_icon_set_flag(next.is_alternate()) {
            warn!(error = %err, "could not save icon set");
        }
        self.prefs.use_alternate_icon_set = next.is_alternate();
        next
    }
}
