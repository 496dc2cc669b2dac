//! Where configuration warnings go.

use std::sync::Mutex;

use tracing::warn;

/// Sink for user-facing warning lines.
pub trait Reporter: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards every line to `tracing::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    lines: Mutex<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self { Self::default() }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Reporter for CollectingReporter {
    fn warn(&self, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}
