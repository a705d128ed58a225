//! Long-running display: periodic refresh plus line commands on stdin.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use eink_weather_core::{Config, IconSet, RefreshScheduler, UiState, config::minutes_to_duration};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::{render, session::Session};

const HELP: &str = "Commands: r(efresh) | z(ip) <code> | i(cons) | p(ause) | resume | q(uit)";

#[derive(Debug, PartialEq, Eq)]
enum WatchCommand {
    Refresh,
    Zip(String),
    ToggleIcons,
    Pause,
    Resume,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<WatchCommand> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_lowercase();

    match command.as_str() {
        "r" | "refresh" => Some(WatchCommand::Refresh),
        "z" | "zip" => parts.next().map(|zip| WatchCommand::Zip(zip.to_string())),
        "i" | "icons" => Some(WatchCommand::ToggleIcons),
        "p" | "pause" => Some(WatchCommand::Pause),
        "resume" => Some(WatchCommand::Resume),
        "h" | "help" | "?" => Some(WatchCommand::Help),
        "q" | "quit" | "exit" => Some(WatchCommand::Quit),
        _ => None,
    }
}

/// `--interval-minutes` wins over the configured interval.
fn refresh_interval(interval_minutes: Option<u64>, config: &Config) -> Duration {
    interval_minutes
        .map(minutes_to_duration)
        .unwrap_or_else(|| config.refresh_interval())
}

pub async fn run(zip: Option<String>, interval_minutes: Option<u64>) -> Result<()> {
    let mut session = Session::open()?;
    let zip = session.select_zip(zip);
    let interval = refresh_interval(interval_minutes, &session.config);

    let mut scheduler = RefreshScheduler::new(
        Arc::clone(&session.machine),
        session.api_key.clone(),
        zip,
        interval,
    );
    let mut states = session.machine.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("{HELP}");
    scheduler.activate();

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                draw(&state, session.prefs.icon_set());
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match parse_command(&line) {
                        Some(WatchCommand::Quit) => break,
                        Some(command) => apply(command, &mut session, &mut scheduler),
                        None => println!("Unknown command '{}'. {HELP}", line.trim()),
                    }
                }
                Ok(None) => {
                    debug!("stdin closed, display keeps refreshing");
                    stdin_open = false;
                }
                Err(err) => {
                    warn!(error = %err, "failed to read stdin, ignoring further input");
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    scheduler.deactivate();
    Ok(())
}

fn apply(command: WatchCommand, session: &mut Session, scheduler: &mut RefreshScheduler) {
    match command {
        WatchCommand::Refresh => {
            session
                .machine
                .request_refresh(scheduler.zip_code(), &session.api_key);
        }
        WatchCommand::Zip(zip) => {
            let restarts = zip != scheduler.zip_code() && scheduler.is_active();
            session.remember_zip(&zip);
            scheduler.set_zip_code(zip);
            // An active loop refreshes on restart; otherwise fetch by hand.
            if !restarts {
                session
                    .machine
                    .request_refresh(scheduler.zip_code(), &session.api_key);
            }
        }
        WatchCommand::ToggleIcons => {
            let icon_set = session.toggle_icon_set();
            println!("Icon set: {icon_set}");
            draw(&session.machine.current(), icon_set);
        }
        WatchCommand::Pause => {
            scheduler.deactivate();
            println!("Paused. Scheduled refreshes stopped until 'resume'.");
        }
        WatchCommand::Resume => {
            if !scheduler.is_active() {
                scheduler.activate();
            }
        }
        WatchCommand::Help => println!("{HELP}"),
        WatchCommand::Quit => {}
    }
}

fn draw(state: &UiState, icon_set: IconSet) {
    println!("\n{}", render::render(state, icon_set));
}
