//! Logging infrastructure: structured panel report logging.
//!
//! Provides [`JsonlReportLogger`], a JSONL file writer that implements
//! the [`ReportLogger`](medpanel_application::ReportLogger) port.

mod jsonl_report_logger;

pub use jsonl_report_logger::JsonlReportLogger;
