//! Display utilities for the Pomodoro Timer CLI.
//!
//! This module provides formatted output for:
//! - The live status line of a running session
//! - Timer events (pause, resume, phase changes, completion)
//! - Session history and saved configuration
//! - Error messages

use std::io::{self, Write};

use chrono::Local;

use crate::timer::{PhaseMarker, TimerEvent};
use crate::types::{EventKind, Phase, Session, SessionConfig, SessionEvent};

// ============================================================================
// StatusLine
// ============================================================================

/// Display-side view of a running session, rebuilt from timer events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    config: SessionConfig,
    pending_config: Option<SessionConfig>,
    marker: PhaseMarker,
    remaining_seconds: u32,
}

impl StatusLine {
    /// Creates a status line at the first work phase.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            pending_config: None,
            marker: Self::first_marker(),
            remaining_seconds: config.work_duration,
        }
    }

    /// Current phase, round and set.
    pub fn marker(&self) -> PhaseMarker {
        self.marker
    }

    /// Seconds left in the current phase.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Updates the view from one event.
    pub fn apply(&mut self, event: &TimerEvent) {
        match event {
            TimerEvent::Tick { remaining_seconds } => {
                self.remaining_seconds = *remaining_seconds;
            }
            TimerEvent::PhaseCompleted {
                next,
                remaining_seconds,
                ..
            } => {
                if next.is_none() {
                    if let Some(config) = self.pending_config.take() {
                        self.config = config;
                    }
                }
                self.marker = next.unwrap_or_else(Self::first_marker);
                self.remaining_seconds = *remaining_seconds;
            }
            TimerEvent::Restarted => {
                self.marker = Self::first_marker();
                self.remaining_seconds = self.config.work_duration;
            }
            TimerEvent::ConfigApplied { config, staged } => {
                if *staged {
                    self.pending_config = Some(*config);
                } else {
                    *self = Self::new(*config);
                }
            }
            _ => {}
        }
    }

    /// Renders e.g. `[作業] ラウンド 1/4 ・ セット 1/1  24:59`.
    pub fn render(&self) -> String {
        format!(
            "[{}] ラウンド {}/{} ・ セット {}/{}  {}",
            Display::phase_label(self.marker.phase),
            self.marker.round,
            self.config.rounds,
            self.marker.set,
            self.config.sets,
            Display::format_time(self.remaining_seconds)
        )
    }

    fn first_marker() -> PhaseMarker {
        PhaseMarker {
            phase: Phase::Work,
            round: 1,
            set: 1,
        }
    }
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the key bindings for an interactive session.
    pub fn show_controls() {
        println!("操作: Enter/p = 開始・一時停止, r = リセット, q = 終了");
        println!("      c <作業> <休憩> <ラウンド> <セット> = 設定変更 (例: c 25:00 5:00 4 1)");
    }

    /// Shows how to start another session.
    pub fn show_next_session_hint() {
        println!("Enterで次のセッションを開始します (q = 終了)");
    }

    /// Shows a running session's configuration.
    pub fn show_session_header(config: &SessionConfig) {
        println!("ポモドーロセッション");
        println!("─────────────────────────────");
        Self::show_config_lines(config);
        println!();
    }

    /// Shows output for one timer event.
    pub fn show_event(event: &TimerEvent, status: &StatusLine) {
        match event {
            TimerEvent::Tick { .. } => Self::redraw(status),
            TimerEvent::SessionStarted { .. } => {
                println!("* セッションを開始しました");
                Self::redraw(status);
            }
            TimerEvent::Resumed => {
                Self::clear_line();
                println!("> タイマーを再開しました");
                Self::redraw(status);
            }
            TimerEvent::Paused => {
                Self::clear_line();
                println!("|| タイマーを一時停止しました");
                Self::redraw(status);
            }
            TimerEvent::Restarted => {
                Self::clear_line();
                println!("<< ラウンド1・セット1に戻しました");
                Self::redraw(status);
            }
            TimerEvent::PhaseCompleted { ended, next, .. } => {
                Self::clear_line();
                println!(
                    "{} 終了 (ラウンド {} ・ セット {})",
                    Self::phase_label(ended.phase),
                    ended.round,
                    ended.set
                );
                if next.is_some() {
                    Self::redraw(status);
                }
            }
            TimerEvent::SessionCompleted { .. } => {
                println!("* セッションが完了しました。お疲れさまでした");
            }
            TimerEvent::ConfigApplied { staged, .. } => {
                Self::clear_line();
                if *staged {
                    println!("設定は現在のセッション終了後に反映されます");
                } else {
                    println!("設定を反映しました");
                    Self::redraw(status);
                }
            }
            TimerEvent::ConfigRejected { message } => {
                Self::clear_line();
                Self::show_error(&format!("設定を反映できません: {}", message));
            }
            TimerEvent::PersistFailed { message } => {
                Self::clear_line();
                Self::show_error(&format!("履歴を保存できませんでした: {}", message));
            }
        }
    }

    /// Shows sessions newest first, at most `limit` of them.
    pub fn show_history(sessions: &[Session], limit: Option<usize>) {
        if sessions.is_empty() {
            println!("セッションの記録はまだありません");
            println!("セッションを完了するとここに表示されます");
            return;
        }

        let shown = limit.unwrap_or(sessions.len());
        for (index, session) in sessions.iter().take(shown).enumerate() {
            if index > 0 {
                println!();
            }
            print!("{}", Self::format_session(session));
        }

        if shown < sessions.len() {
            println!();
            println!("… 他 {} 件", sessions.len() - shown);
        }
    }

    /// Shows the saved configuration.
    pub fn show_config(config: &SessionConfig) {
        println!("ポモドーロ設定");
        println!("─────────────────────────────");
        Self::show_config_lines(config);
    }

    /// Shows a success message for a saved configuration.
    pub fn show_config_saved(config: &SessionConfig) {
        println!("* 設定を保存しました");
        Self::show_config_lines(config);
    }

    /// Shows a success message for a cleared history.
    pub fn show_history_cleared() {
        println!("* 履歴を削除しました");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Formats seconds as zero-padded `MM:SS`.
    pub fn format_time(total_seconds: u32) -> String {
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    /// Short label for a phase.
    pub fn phase_label(phase: Phase) -> &'static str {
        match phase {
            Phase::Work => "作業",
            Phase::ShortBreak => "休憩",
            Phase::LongBreak => "長い休憩",
        }
    }

    /// Formats one history entry with its event log.
    pub fn format_session(session: &Session) -> String {
        let mut out = format!(
            "{}  {} 作業 ・ {} 休憩 ・ {} ラウンド ・ {} セット{}\n",
            session.date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            Self::format_time(session.config.work_duration),
            Self::format_time(session.config.rest_duration),
            session.config.rounds,
            session.config.sets,
            if session.completed { "" } else { " (未完了)" }
        );
        for event in &session.events {
            out.push_str("  ");
            out.push_str(&Self::format_event(event, &session.config));
            out.push('\n');
        }
        out
    }

    /// Formats one history event, e.g. `10:15:02 - Complete ・ ラウンド 1/4 ・ セット 1/1 ・ 作業`.
    pub fn format_event(event: &SessionEvent, config: &SessionConfig) -> String {
        format!(
            "{} {} - {} ・ ラウンド {}/{} ・ セット {}/{} ・ {}",
            Self::event_icon(event.kind),
            event.time.with_timezone(&Local).format("%H:%M:%S"),
            Self::event_label(event.kind),
            event.round,
            config.rounds,
            event.set,
            config.sets,
            if event.is_work_time { "作業" } else { "休憩" }
        )
    }

    fn event_icon(kind: EventKind) -> &'static str {
        match kind {
            EventKind::Start => ">",
            EventKind::Pause => "||",
            EventKind::Restart => "<<",
            EventKind::Complete => "*",
        }
    }

    fn event_label(kind: EventKind) -> &'static str {
        match kind {
            EventKind::Start => "Start",
            EventKind::Pause => "Pause",
            EventKind::Restart => "Restart",
            EventKind::Complete => "Complete",
        }
    }

    fn show_config_lines(config: &SessionConfig) {
        println!("作業時間: {}", Self::format_time(config.work_duration));
        println!("休憩時間: {}", Self::format_time(config.rest_duration));
        println!(
            "長い休憩: {}",
            Self::format_time(config.long_break_duration())
        );
        println!("ラウンド数: {}", config.rounds);
        println!("セット数: {}", config.sets);
    }

    fn redraw(status: &StatusLine) {
        let mut stdout = io::stdout().lock();
        // Best effort; a closed stdout only loses the status line.
        let _ = write!(stdout, "\r\x1b[2K{}", status.render());
        let _ = stdout.flush();
    }

    fn clear_line() {
        print!("\r\x1b[2K");
    }
}

// ============================================================================
// Tests
// ============================================================================
