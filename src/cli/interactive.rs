//! Foreground session runner.
//!
//! Drives a `TimerEngine` on the current task while:
//! - a display task renders `TimerEvent`s and quits after completion
//! - a dedicated thread turns stdin lines into `Command`s
//! - Ctrl-C is mapped to `Command::Quit`

use std::io::{self, BufRead};
use std::thread;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::history::SessionHistory;
use crate::notify::Notifier;
use crate::storage::KeyValueStore;
use crate::timer::{Command, TimerEngine, TimerEvent};
use crate::types::SessionConfig;

use super::commands::{parse_count, parse_duration, MAX_ROUNDS, MAX_SETS};
use super::display::{Display, StatusLine};

/// Maps one line of user input to a command.
///
/// An empty line toggles, like pressing the start/pause button.
/// `c <work> <rest> <rounds> <sets>` offers a new configuration.
///
/// # Errors
///
/// Returns a message for unknown input or invalid configuration values.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let lowered = line.trim().to_ascii_lowercase();
    let mut words = lowered.split_whitespace();
    let verb = words.next().unwrap_or("");
    let args: Vec<&str> = words.collect();

    match (verb, args.as_slice()) {
        ("" | "p" | "s" | "start" | "pause", []) => Ok(Command::Toggle),
        ("r" | "reset", []) => Ok(Command::Reset),
        ("q" | "quit" | "exit", []) => Ok(Command::Quit),
        ("c" | "config", [work, rest, rounds, sets]) => Ok(Command::ApplyConfig(SessionConfig {
            work_duration: parse_duration(work)?,
            rest_duration: parse_duration(rest)?,
            rounds: parse_count(rounds, "ラウンド数", MAX_ROUNDS)?,
            sets: parse_count(sets, "セット数", MAX_SETS)?,
        })),
        ("c" | "config", _) => Err("使い方: c <作業> <休憩> <ラウンド> <セット>".to_string()),
        _ => Err(format!("不明な操作です: {}", line.trim())),
    }
}

/// Runs sessions in the foreground until the user quits.
///
/// The countdown starts immediately. Unless `continuous` is set, the runner
/// also stops once the first session completes.
pub async fn run_session<S, N>(
    config: SessionConfig,
    history: SessionHistory<S>,
    notifier: N,
    continuous: bool,
) -> Result<()>
where
    S: KeyValueStore,
    N: Notifier,
{
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let mut engine = TimerEngine::new(config, history, notifier, event_tx)
        .context("Invalid session configuration")?;

    Display::show_session_header(&config);
    Display::show_controls();

    // Queued ahead of any user input.
    command_tx
        .send(Command::Toggle)
        .context("Failed to start session")?;

    let quit_tx = command_tx.clone();
    let display = tokio::spawn(async move {
        let mut status = StatusLine::new(config);
        while let Some(event) = event_rx.recv().await {
            status.apply(&event);
            Display::show_event(&event, &status);
            if matches!(event, TimerEvent::SessionCompleted { .. }) {
                if continuous {
                    Display::show_next_session_hint();
                } else {
                    // The engine may already be gone.
                    let _ = quit_tx.send(Command::Quit);
                }
            }
        }
    });

    spawn_input_reader(command_tx.clone())?;

    let signal_tx = command_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, quitting");
            let _ = signal_tx.send(Command::Quit);
        }
    });

    drop(command_tx);

    engine.run(command_rx).await?;

    // Closing the event channel ends the display task.
    drop(engine);
    display.await.context("Display task failed")?;
    println!();

    Ok(())
}

/// Reads stdin on its own thread; blocking reads would stall the runtime.
fn spawn_input_reader(tx: mpsc::UnboundedSender<Command>) -> Result<()> {
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match parse_command(&line) {
                    Ok(command) => {
                        if tx.send(command).is_err() {
                            break;
                        }
                    }
                    Err(message) => Display::show_error(&message),
                }
            }
            debug!("stdin reader finished");
        })
        .context("Failed to spawn stdin reader")?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
