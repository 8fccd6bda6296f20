//! Lifecycle events
//!
//! Explicit and typed, so boot logs stay greppable.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file read and validated
    ConfigLoaded,
    /// SQLite file opened and schema applied
    DatabaseOpened,
    /// Sample dataset inserted
    SampleLoaded,
    /// Listener bound, requests accepted
    ServeStart,
    /// Server loop returned
    ServeStop,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DatabaseOpened => "DATABASE_OPENED",
            Event::SampleLoaded => "SAMPLE_LOADED",
            Event::ServeStart => "SERVE_START",
            Event::ServeStop => "SERVE_STOP",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Log a lifecycle event with `key=value` detail fields
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let detail = fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ");
    tracing::info!(event = event.as_str(), detail = %detail, "lifecycle");
}
