//! Binary crate for the `eink-weather` terminal display.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and settings
//! - Rendering the weather state in an e-ink friendly layout

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod render;
mod session;
mod watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is the display.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,eink_weather=info,eink_weather_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
