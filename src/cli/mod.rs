//! CLI module for the Pomodoro Timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `interactive`: Foreground session runner fed by stdin and Ctrl-C

pub mod commands;
pub mod display;
pub mod interactive;

pub use commands::{Cli, Commands, ConfigAction, ConfigArgs, HistoryArgs, RunArgs};
pub use display::{Display, StatusLine};
pub use interactive::{parse_command, run_session};
