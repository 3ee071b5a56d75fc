use std::time::{Duration, Instant};

use tracing::info;

/// One labeled point in the startup timeline.
#[derive(Debug, Clone)]
pub struct TraceEntry {
    pub label: String,
    pub at: Duration,
}

/// Startup timing trace.
///
/// Recorded by the bootstrap steps, carried in the payload, and emitted on
/// the first ready update. The consumed flag makes emission one-shot; there
/// is no ambient global involved.
#[derive(Debug)]
pub struct StartupTrace {
    origin: Instant,
    entries: Vec<TraceEntry>,
    emitted: bool,
}

impl StartupTrace {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            entries: Vec::new(),
            emitted: false,
        }
    }

    /// Records `label` at the current offset from the trace origin.
    pub fn mark(&mut self, label: &str) {
        self.entries.push(TraceEntry {
            label: label.to_string(),
            at: self.origin.elapsed(),
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Emits every entry through the log stream. Later calls are no-ops.
    /// Returns whether this call did the emitting.
    pub fn emit_once(&mut self) -> bool {
        if self.emitted {
            return false;
        }
        self.emitted = true;
        for entry in &self.entries {
            info!(step = %entry.label, at_us = entry.at.as_micros() as u64, "startup timing");
        }
        true
    }

    pub fn emitted(&self) -> bool {
        self.emitted
    }
}

impl Default for StartupTrace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_accumulate_in_order() {
        let mut trace = StartupTrace::new();
        trace.mark("first");
        trace.mark("second");
        let entries = trace.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "first");
        assert_eq!(entries[1].label, "second");
        assert!(entries[0].at <= entries[1].at);
    }

    #[test]
    fn emit_is_one_shot() {
        let mut trace = StartupTrace::new();
        trace.mark("only");
        assert!(trace.emit_once());
        assert!(!trace.emit_once());
        assert!(trace.emitted());
    }
}
