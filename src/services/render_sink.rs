//! Destinations for rendered time strings

use std::{
    io::{self, Write},
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// Receives every string the timer renders
pub trait RenderSink: Send + Sync {
    fn display(&self, text: &str);
}

/// Rewrites a single terminal line on stdout
#[derive(Debug, Default)]
pub struct TerminalSink;

impl RenderSink for TerminalSink {
    fn display(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = write!(stdout, "\r{}\x1b[K", text).and_then(|_| stdout.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

/// One rendered string as emitted by `JsonSink`
#[derive(Debug, Clone, Serialize)]
pub struct RenderEvent<'a> {
    pub display: &'a str,
    pub timestamp: DateTime<Utc>,
}

/// Prints one JSON object per render on stdout
#[derive(Debug, Default)]
pub struct JsonSink;

impl RenderSink for JsonSink {
    fn display(&self, text: &str) {
        let event = RenderEvent { display: text, timestamp: Utc::now() };
        match serde_json::to_string(&event) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to serialize render event: {}", e),
        }
    }
}

/// Keeps every rendered string in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last(&self) -> Option<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }
}

impl RenderSink for MemorySink {
    fn display(&self, text: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        assert_eq!(sink.last(), None);
        sink.display("1 sec");
        sink.display("2 sec");
        assert_eq!(sink.lines(), vec!["1 sec", "2 sec"]);
        assert_eq!(sink.last().as_deref(), Some("2 sec"));
    }

    #[test]
    fn test_render_event_shape() {
        let event = RenderEvent { display: "1:40 min", timestamp: Utc::now() };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["display"], "1:40 min");
        assert!(value["timestamp"].is_string());
    }
}
