//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Diagnostic log file written through tracing
    pub file: Option<PathBuf>,
    /// JSONL audit log of agent results and reports
    pub report_log: Option<PathBuf>,
}
