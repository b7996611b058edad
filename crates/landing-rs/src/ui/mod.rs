//! Front-end-neutral console model.
//!
//! Tracing output is captured as [`LogLine`]s (see [`tracing`]) and kept in
//! a bounded [`Console`] that lives in the shared page state, so any front
//! end can render the same log pane.
//!
//! ```text
//! tracing macros ──▶ UiTracingLayer ──▶ LogBuffer ──flush_into──▶ Landing.console
//! ```

pub mod tracing;

use serde::{Deserialize, Serialize};

/// Maximum log lines kept in memory.
pub const MAX_LOG_LINES: usize = 2000;
/// Trim to this many when the cap is exceeded.
pub const LOG_TRIM_TO: usize = 1200;

// ── Log Types ─────────────────────────────────────────────────────────

/// A single log line captured from tracing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub time: String,
    pub level: LogLevel,
    /// Page component that emitted the line (`popup`, `countdown`, ...).
    pub component: String,
    pub message: String,
}

/// Log severity level (mirrors tracing levels).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Short fixed-width label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

// ── Console ───────────────────────────────────────────────────────────

/// Bounded log history shown in the page console pane.
#[derive(Debug, Default, Clone)]
pub struct Console {
    lines: Vec<LogLine>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append lines, dropping the oldest once over [`MAX_LOG_LINES`].
    pub fn extend(&mut self, lines: impl IntoIterator<Item = LogLine>) {
        self.lines.extend(lines);
        if self.lines.len() > MAX_LOG_LINES {
            let trim_to = self.lines.len() - LOG_TRIM_TO;
            self.lines.drain(..trim_to);
        }
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// The most recent `n` lines at or above `min`.
    pub fn tail(&self, n: usize, min: LogLevel) -> Vec<&LogLine> {
        let mut out: Vec<&LogLine> = self
            .lines
            .iter()
            .rev()
            .filter(|l| l.level >= min)
            .take(n)
            .collect();
        out.reverse();
        out
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(level: LogLevel, message: &str) -> LogLine {
        LogLine {
            time: "12:00:00".into(),
            level,
            component: "page".into(),
            message: message.into(),
        }
    }

    #[test]
    fn log_level_labels() {
        assert_eq!(LogLevel::Info.label(), "INFO ");
        assert_eq!(LogLevel::Error.label(), "ERROR");
        assert_eq!(LogLevel::Debug.label(), "DEBUG");
        assert_eq!(LogLevel::Trace.label(), "TRACE");
        assert_eq!(LogLevel::Warn.label(), "WARN ");
    }

    #[test]
    fn console_trims_to_limit() {
        let mut console = Console::new();
        console.extend((0..=MAX_LOG_LINES).map(|i| line(LogLevel::Info, &i.to_string())));
        assert_eq!(console.len(), LOG_TRIM_TO);
        assert_eq!(
            console.lines().last().unwrap().message,
            MAX_LOG_LINES.to_string()
        );
    }

    #[test]
    fn tail_filters_by_level_and_keeps_order() {
        let mut console = Console::new();
        console.extend([
            line(LogLevel::Debug, "a"),
            line(LogLevel::Warn, "b"),
            line(LogLevel::Error, "c"),
            line(LogLevel::Info, "d"),
        ]);
        let tail: Vec<&str> = console
            .tail(2, LogLevel::Info)
            .iter()
            .map(|l| l.message.as_str())
            .collect();
        assert_eq!(tail, ["c", "d"]);
    }
}
