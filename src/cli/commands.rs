//! Command definitions for the Pomodoro Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::SessionConfig;

/// Longest accepted duration (99:59).
const MAX_DURATION_SECS: u32 = 99 * 60 + 59;

/// Most rounds per set.
pub const MAX_ROUNDS: u32 = 10;

/// Most sets per session.
pub const MAX_SETS: u32 = 5;

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro Timer CLI with rounds, sets and session history
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-sets",
    version,
    about = "ラウンドとセットで進むポモドーロタイマーCLI",
    long_about = "作業と休憩をラウンド・セット単位で繰り返すポモドーロタイマー。\n\
                  完了したセッションは履歴としてローカルに保存されます。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding history and settings
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a session in the foreground
    Run(RunArgs),

    /// Show recorded sessions
    History(HistoryArgs),

    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the saved configuration
    Show,
    /// Change and save the configuration
    Set(ConfigArgs),
}

// ============================================================================
// Arguments
// ============================================================================

/// Durations and counts; omitted values keep the saved configuration.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Work duration (MM:SS or seconds, up to 99:59)
    #[arg(short, long, value_parser = parse_duration)]
    pub work: Option<u32>,

    /// Short break duration (MM:SS or seconds); the long break is three times this
    #[arg(short = 'b', long, value_parser = parse_duration)]
    pub rest: Option<u32>,

    /// Rounds per set (1-10)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_ROUNDS)))]
    pub rounds: Option<u32>,

    /// Number of sets (1-5)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SETS)))]
    pub sets: Option<u32>,
}

impl ConfigArgs {
    /// Overlays the given values on `base`.
    pub fn apply_to(&self, base: SessionConfig) -> SessionConfig {
        SessionConfig {
            work_duration: self.work.unwrap_or(base.work_duration),
            rest_duration: self.rest.unwrap_or(base.rest_duration),
            rounds: self.rounds.unwrap_or(base.rounds),
            sets: self.sets.unwrap_or(base.sets),
        }
    }

    /// Returns true if no value was given.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Disable the terminal bell at the end of each phase
    #[arg(long)]
    pub no_sound: bool,

    /// Keep running after a session completes; start the next one with Enter
    #[arg(long)]
    pub continuous: bool,
}

/// Arguments for the history command
#[derive(Args, Debug, Clone, Default)]
pub struct HistoryArgs {
    /// Show at most this many sessions
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Print the raw JSON history
    #[arg(long, conflicts_with = "clear")]
    pub json: bool,

    /// Delete all recorded sessions
    #[arg(long)]
    pub clear: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a count between 1 and `max`.
pub fn parse_count(s: &str, label: &str, max: u32) -> Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(format!("{}は1から{}の範囲で指定してください: {}", label, max, s)),
    }
}

/// Parses a duration given as `MM:SS`, `MM:` style minutes, or plain seconds.
///
/// - Minutes at most 99, seconds at most 59
/// - The result must be between 1 second and 99:59
pub fn parse_duration(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let seconds = match s.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u32 = parse_part(minutes, "分")?;
            let seconds: u32 = parse_part(seconds, "秒")?;
            if minutes > 99 {
                return Err("分は99以下で指定してください".to_string());
            }
            if seconds > 59 {
                return Err("秒は59以下で指定してください".to_string());
            }
            minutes * 60 + seconds
        }
        None => parse_part(s, "秒数")?,
    };

    if seconds == 0 || seconds > MAX_DURATION_SECS {
        return Err("時間は00:01から99:59の範囲で指定してください".to_string());
    }
    Ok(seconds)
}

fn parse_part(part: &str, label: &str) -> Result<u32, String> {
    if part.is_empty() {
        return Ok(0);
    }
    if !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("{}は数字で指定してください: {}", label, part));
    }
    part.parse()
        .map_err(|_| format!("{}が大きすぎます: {}", label, part))
}

// ============================================================================
// Tests
// ============================================================================
