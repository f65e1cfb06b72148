//! Infrastructure layer for medpanel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod evidence;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileEvidenceConfig, FileInferenceConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat, FilePanelConfig, FileTimeoutsConfig,
};
pub use evidence::LocalEvidenceRetriever;
pub use logging::JsonlReportLogger;
pub use providers::OpenAiCompatibleGateway;
