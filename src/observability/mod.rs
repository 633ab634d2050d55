//! Observability subsystem
//!
//! Provides:
//! - Structured logging (JSON lines on stderr)
//! - Per-store metrics counters
//! - Begin/complete scopes around CLI commands
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on store state
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use schema_builder::observability::{Logger, Event, ObservationScope};
//!
//! Logger::info("SCHEMA_LOADED", &[("properties", "4")]);
//!
//! let scope = ObservationScope::new("SHOW");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, StoreMetrics};
pub use scope::ObservationScope;

/// Severity an event is logged at
fn event_severity(event: Event) -> Severity {
    if event.is_detail() {
        Severity::Trace
    } else {
        Severity::Info
    }
}

/// Log an event
pub fn log_event(event: Event) {
    Logger::log(event_severity(event), event.as_str(), &[]);
}

/// Log an event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_events_log_at_trace() {
        assert_eq!(event_severity(Event::PropertyAdded), Severity::Trace);
        assert_eq!(event_severity(Event::SchemaLoaded), Severity::Info);
    }

    #[test]
    fn test_log_event() {
        log_event(Event::StoreCreated);
        log_event(Event::SessionEnd);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[("schema_path", "/tmp/test.json")]);
    }
}
