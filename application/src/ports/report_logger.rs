//! Port for structured report logging.
//!
//! Defines the [`ReportLogger`] trait for persisting panel events (agent
//! results, critique, final reports and fatal failures) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the audit
//! trail in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured panel event for logging.
pub struct ReportEvent {
    /// Event type identifier (`agent_result`, `critique`, `panel_report`, `panel_failed`).
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ReportEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging panel events to a structured log.
///
/// `log` is synchronous and infallible: logging failures never affect the
/// panel run.
pub trait ReportLogger: Send + Sync {
    fn log(&self, event: ReportEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoReportLogger;

impl ReportLogger for NoReportLogger {
    fn log(&self, _event: ReportEvent) {}
}
