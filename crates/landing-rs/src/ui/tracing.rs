//! Capture of `tracing` events for the page console.
//!
//! [`UiTracingLayer`] turns each event into a [`LogLine`] tagged with the
//! page component that emitted it (`popup`, `diagnosis`, ...) and parks it
//! in a [`LogBuffer`]. The front end moves parked lines into
//! [`Landing::console`] with [`LogBuffer::flush_into`] once per frame.
//!
//! The buffer has its own lock. Emitting a log line never touches the page
//! mutex, so a diagnosis task logging from a tokio worker cannot stall the
//! render thread.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use super::{LOG_TRIM_TO, LogLevel, LogLine, MAX_LOG_LINES};
use crate::page::Landing;

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => Self::Trace,
            Level::DEBUG => Self::Debug,
            Level::INFO => Self::Info,
            Level::WARN => Self::Warn,
            Level::ERROR => Self::Error,
        }
    }
}

/// Lines parked between frames.
#[derive(Clone, Default)]
pub struct LogBuffer {
    pending: Arc<Mutex<Vec<LogLine>>>,
}

impl LogBuffer {
    fn push(&self, line: LogLine) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.push(line);
        // Nobody may be draining (headless runs); keep the backlog bounded.
        if pending.len() > MAX_LOG_LINES {
            let excess = pending.len() - LOG_TRIM_TO;
            pending.drain(..excess);
        }
    }

    /// Take every parked line, oldest first.
    pub fn drain(&self) -> Vec<LogLine> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *pending)
    }

    /// Move parked lines into the page console. The page lock is taken
    /// only when there is something to move.
    pub fn flush_into(&self, state: &Arc<Mutex<Landing>>) {
        let lines = self.drain();
        if lines.is_empty() {
            return;
        }
        state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .console
            .extend(lines);
    }
}

/// Layer feeding a [`LogBuffer`].
pub struct UiTracingLayer {
    sink: LogBuffer,
}

impl UiTracingLayer {
    /// Build the layer together with the buffer the front end drains.
    pub fn new() -> (Self, LogBuffer) {
        let sink = LogBuffer::default();
        (Self { sink: sink.clone() }, sink)
    }
}

impl<S> Layer<S> for UiTracingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = EventFields::default();
        event.record(&mut fields);

        let meta = event.metadata();
        self.sink.push(LogLine {
            time: Local::now().format("%H:%M:%S").to_string(),
            level: LogLevel::from(*meta.level()),
            component: component_of(meta.target()).to_string(),
            message: fields.into_message(),
        });
    }
}

/// Page component for an event target: `landing_rs::popup` is `popup`,
/// a crate root such as `landing_tui` stays as is.
fn component_of(target: &str) -> &str {
    match target.split_once("::") {
        Some((_, rest)) => rest.split("::").next().unwrap_or(rest),
        None => target,
    }
}

/// Message text plus `key=value` pairs of an event.
#[derive(Default)]
struct EventFields {
    message: String,
    extras: Vec<String>,
}

impl EventFields {
    fn into_message(self) -> String {
        match (self.message.is_empty(), self.extras.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.extras.join(" "),
            (false, false) => format!("{} {{{}}}", self.message, self.extras.join(", ")),
        }
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.extras.push(format!("{}={value}", field.name()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            // `format_args!` messages arrive here and render without quotes.
            self.message = format!("{value:?}");
        } else {
            self.extras.push(format!("{}={value:?}", field.name()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn captures_message_and_fields() {
        let (layer, buffer) = UiTracingLayer::new();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(kind = "transport_failure", "Diagnosis failed");
            tracing::info!("plain");
        });

        let lines = buffer.drain();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].level, LogLevel::Warn);
        assert_eq!(
            lines[0].message,
            "Diagnosis failed {kind=transport_failure}"
        );
        assert_eq!(lines[1].message, "plain");
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn tags_lines_with_component() {
        let (layer, buffer) = UiTracingLayer::new();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "landing_rs::popup::focus", "shown");
            tracing::info!(target: "landing_tui", "started");
        });

        let lines = buffer.drain();
        assert_eq!(lines[0].component, "popup");
        assert_eq!(lines[1].component, "landing_tui");
    }

    #[test]
    fn fields_only_event_joins_pairs() {
        let (layer, buffer) = UiTracingLayer::new();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(slot = 3, remaining_ms = 1000);
        });

        let lines = buffer.drain();
        assert_eq!(lines[0].message, "slot=3 remaining_ms=1000");
        assert_eq!(lines[0].level, LogLevel::Debug);
    }

    #[test]
    fn backlog_stays_bounded() {
        let buffer = LogBuffer::default();
        for i in 0..=MAX_LOG_LINES {
            buffer.push(LogLine {
                time: String::new(),
                level: LogLevel::Info,
                component: String::new(),
                message: i.to_string(),
            });
        }
        let lines = buffer.drain();
        assert_eq!(lines.len(), LOG_TRIM_TO);
        assert_eq!(lines.last().map(|l| l.message.as_str()), Some("2000"));
    }
}
