//! Application layer for medpanel
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ConfigIssue, PanelConfig};
pub use ports::{
    evidence::{EvidenceRetriever, NoEvidence, RetrievalError},
    inference_gateway::{GatewayError, InferenceGateway, PromptContext},
    progress::{NoProgress, ProgressNotifier},
    report_logger::{NoReportLogger, ReportEvent, ReportLogger},
};
pub use use_cases::invoke_agent::{AgentInput, InvokeAgentUseCase};
pub use use_cases::run_panel::{FirstPass, PanelError, ReviewOutcome, RunPanelUseCase};
