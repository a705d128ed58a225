use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use eink_weather_core::{Config, PreferenceStore};
use inquire::{Confirm, Password, PasswordDisplayMode, Text};

use crate::{render, session::Session, watch};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "eink-weather", version, about = "Current weather for e-ink displays")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Fetch and show the current weather once.
    Show {
        /// Zip code; defaults to the last one used.
        zip: Option<String>,
    },

    /// Keep the display updated, refreshing on a fixed interval.
    Watch {
        /// Zip code; defaults to the last one used.
        zip: Option<String>,

        /// Minutes between refreshes; defaults to the configured interval.
        #[arg(long)]
        interval_minutes: Option<u64>,
    },

    /// View or change the zip code and icon set. Prompts when no flag is given.
    Settings {
        #[arg(long)]
        zip: Option<String>,

        /// Use the alternate (v2) icon set.
        #[arg(long)]
        alternate_icons: Option<bool>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { zip } => show(zip).await,
            Command::Watch {
                zip,
                interval_minutes,
            } => watch::run(zip, interval_minutes).await,
            Command::Settings {
                zip,
                alternate_icons,
            } => settings(zip, alternate_icons),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(zip: Option<String>) -> anyhow::Result<()> {
    let mut session = Session::open()?;
    let zip = session.select_zip(zip);

    session
        .machine
        .request_refresh(&zip, &session.api_key)
        .await
        .context("Weather refresh task failed")?;

    println!("{}", render::render(&session.machine.current(), session.prefs.icon_set()));
    Ok(())
}

fn settings(zip: Option<String>, alternate_icons: Option<bool>) -> anyhow::Result<()> {
    let store = PreferenceStore::open_default()?;
    let prefs = store.load();

    let (zip, alternate_icons) = if zip.is_none() && alternate_icons.is_none() {
        let zip = Text::new("Zip code:")
            .with_default(&prefs.last_zip_code)
            .prompt()
            .context("Failed to read zip code")?;
        let alternate = Confirm::new("Use alternate (v2) icons?")
            .with_default(prefs.use_alternate_icon_set)
            .prompt()
            .context("Failed to read icon set choice")?;
        (Some(zip), Some(alternate))
    } else {
        (zip, alternate_icons)
    };

    if let Some(zip) = zip.as_deref().map(str::trim).filter(|z| !z.is_empty()) {
        store.save_zip_code(zip)?;
    }
    if let Some(flag) = alternate_icons {
        store.save_icon_set_flag(flag)?;
    }

    let prefs = store.load();
    println!("Zip code: {}", prefs.last_zip_code);
    println!("Icon set: {}", prefs.icon_set());
    Ok(())
}
