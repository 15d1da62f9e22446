//! Observability for driftstore
//!
//! Structured JSON logging, typed lifecycle events, and deterministic
//! counters.
//!
//! # Principles
//!
//! 1. Observability is read-only; no side effects on the pipeline
//! 2. No async or background threads
//! 3. Deterministic output (sorted fields, monotonic counters)
//! 4. The laziness contract is observable: every blob decode increments a
//!    counter, so tests can assert a projected read costs zero decodes

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event with fields, at the severity the event implies.
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_rejection() {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
