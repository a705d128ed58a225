//! Display state and the refresh lifecycle.
//!
//! [`WeatherStateMachine`] owns the single [`UiState`] observers render from.
//! Every refresh sets `Loading` first and ends in `Success` or `Error`.
//! Overlapping refreshes are not sequenced: whichever fetch completes last
//! decides the visible state, even if it was issued first.
//!
//! [`RefreshScheduler`] drives the periodic refresh while the display is
//! active.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{model::UiState, provider::WeatherProvider};

pub const UNKNOWN_ERROR: &str = "Unknown error";

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);
const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug)]
pub struct WeatherStateMachine {
    provider: Arc<dyn WeatherProvider>,
    state: Arc<watch::Sender<UiState>>,
}

impl WeatherStateMachine {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (state, _) = watch::channel(UiState::Loading);
        Self {
            provider,
            state: Arc::new(state),
        }
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> UiState {
        self.state.borrow().clone()
    }

    /// Switch to `Loading` and fetch in the background.
    ///
    /// The returned handle completes once the result has been applied. It can
    /// be dropped; the fetch still runs to completion.
    pub fn request_refresh(&self, zip: &str, api_key: &str) -> JoinHandle<()> {
        self.state.send_replace(UiState::Loading);

        let provider = Arc::clone(&self.provider);
        let state = Arc::clone(&self.state);
        let zip = zip.to_string();
        let api_key = api_key.to_string();

        tokio::spawn(async move {
            let next = match provider.fetch_by_zip(&zip, &api_key).await {
                Ok(snapshot) => {
                    info!(
                        zip = %zip,
                        location = %snapshot.location_name,
                        temperature_c = snapshot.temperature_c,
                        "weather updated"
                    );
                    UiState::Success(snapshot)
                }
                Err(err) => {
                    warn!(zip = %zip, error = %err, "weather fetch failed");
                    UiState::Error(failure_message(&err))
                }
            };
            state.send_replace(next);
        })
    }
}

fn failure_message(err: &(dyn std::error::Error + '_)) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

/// Periodic refresh loop bound to the display's active phase.
///
/// While active, a refresh fires immediately and then once per interval.
/// Deactivating or changing the zip code cancels the pending wait only; a
/// fetch already in flight still lands.
#[derive(Debug)]
pub struct RefreshScheduler {
    machine: Arc<WeatherStateMachine>,
    api_key: String,
    zip: String,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn new(
        machine: Arc<WeatherStateMachine>,
        api_key: impl Into<String>,
        zip: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            machine,
            api_key: api_key.into(),
            zip: zip.into(),
            interval: interval.clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL),
            task: None,
        }
    }

    pub fn zip_code(&self) -> &str {
        &self.zip
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Enter the active phase, restarting the loop if it was already running.
    pub fn activate(&mut self) {
        self.deactivate();
        info!(zip = %self.zip, interval_secs = self.interval.as_secs(), "starting refresh loop");
        self.task = Some(spawn_refresh_loop(
            Arc::clone(&self.machine),
            self.zip.clone(),
            self.api_key.clone(),
            self.interval,
        ));
    }

    pub fn deactivate(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(zip = %self.zip, "refresh loop stopped");
        }
    }

    /// Point the loop at a new zip code. An active loop restarts right away.
    pub fn set_zip_code(&mut self, zip: impl Into<String>) {
        let zip = zip.into();
        if zip == self.zip {
            return;
        }

        self.zip = zip;
        if self.task.is_some() {
            self.activate();
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.deactivate();
    }
}

fn spawn_refresh_loop(
    machine: Arc<WeatherStateMachine>,
    zip: String,
    api_key: String,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // First tick completes immediately.
            ticker.tick().await;
            debug!(zip = %zip, "scheduled refresh");
            machine.request_refresh(&zip, &api_key);
        }
    })
}
