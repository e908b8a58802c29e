//! Begin/complete logging around one index operation
//!
//! - `{EVENT}_BEGIN` on creation
//! - `{EVENT}_COMPLETE` on `complete`
//! - `{EVENT}_FAILED` on `fail`
//! - `{EVENT}_INCOMPLETE` if dropped without either

use std::time::Instant;

use super::events::IndexEvent;
use super::logger::Logger;

/// Logs the lifecycle of one operation
pub struct ObservationScope {
    event: IndexEvent,
    started: Instant,
    finished: bool,
}

impl ObservationScope {
    /// Starts a scope, logging `{event}_BEGIN`
    pub fn begin(event: IndexEvent, fields: &[(&str, &str)]) -> Self {
        Logger::trace(&format!("{}_BEGIN", event), fields);
        Self {
            event,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Milliseconds since the scope began
    pub fn elapsed_ms(&self) -> String {
        self.started.elapsed().as_millis().to_string()
    }

    /// Logs `{event}_COMPLETE` with `fields` and the elapsed time
    pub fn complete(mut self, fields: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.elapsed_ms();
        let mut all: Vec<(&str, &str)> = fields.to_vec();
        all.push(("elapsed_ms", elapsed.as_str()));
        Logger::info(&format!("{}_COMPLETE", self.event), &all);
    }

    /// Logs `{event}_FAILED` at ERROR with the reason
    pub fn fail(mut self, reason: &str) {
        self.finished = true;
        Logger::error(&format!("{}_FAILED", self.event), &[("reason", reason)]);
    }

    /// True once `complete` or `fail` has run
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.event),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}
