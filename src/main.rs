//! Pomodoro Timer CLI - work and break phases over rounds and sets
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - A work phase followed by a short break, repeated for each round
//! - A long break (three times the short break) between sets
//! - Every finished session is kept in a local history

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use pomodoro_sets::cli::{run_session, Cli, Commands, ConfigAction, Display, HistoryArgs, RunArgs};
use pomodoro_sets::notify::TerminalBell;
use pomodoro_sets::storage::{resolve_data_dir, FileStore};
use pomodoro_sets::{SessionHistory, SettingsStore};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            let store = open_store(cli.data_dir)?;
            run(store, &args).await?;
        }
        Some(Commands::History(args)) => {
            let store = open_store(cli.data_dir)?;
            show_history(store, &args)?;
        }
        Some(Commands::Config { action }) => {
            let settings = SettingsStore::new(open_store(cli.data_dir)?);
            match action {
                ConfigAction::Show => Display::show_config(&settings.load()),
                ConfigAction::Set(args) => {
                    if args.is_empty() {
                        anyhow::bail!("変更する値を指定してください (--work, --rest, --rounds, --sets)");
                    }
                    let config = args.apply_to(settings.load());
                    settings
                        .save(&config)
                        .context("Failed to save settings")?;
                    Display::show_config_saved(&config);
                }
            }
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Opens the store in the resolved data directory.
fn open_store(data_dir: Option<PathBuf>) -> Result<FileStore> {
    let dir = resolve_data_dir(data_dir).context("Failed to locate data directory")?;
    tracing::debug!("data directory: {}", dir.display());
    Ok(FileStore::new(dir))
}

/// Runs one session with the saved settings and any overrides.
async fn run(store: FileStore, args: &RunArgs) -> Result<()> {
    let config = args.config.apply_to(SettingsStore::new(store.clone()).load());
    let bell = TerminalBell::new(args.no_sound);
    run_session(config, SessionHistory::new(store), bell, args.continuous).await
}

/// Prints, dumps or clears the session history.
fn show_history(store: FileStore, args: &HistoryArgs) -> Result<()> {
    let history = SessionHistory::new(store);

    if args.clear {
        history.clear().context("Failed to clear history")?;
        Display::show_history_cleared();
        return Ok(());
    }

    let sessions = history.load();
    if args.json {
        let shown = &sessions[..args.limit.unwrap_or(sessions.len()).min(sessions.len())];
        println!(
            "{}",
            serde_json::to_string_pretty(shown).context("Failed to encode history")?
        );
    } else {
        Display::show_history(&sessions, args.limit);
    }
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
