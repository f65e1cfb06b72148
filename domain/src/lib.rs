//! Domain layer for medpanel
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Panel
//!
//! A case (an optional image plus clinical notes) is analyzed by a panel of
//! specialist agents:
//!
//! - **First pass**: Radiologist, Internist and Evidence Reviewer each rank
//!   candidate diagnoses independently
//! - **Adversarial pass**: the Devil's Advocate critiques the first pass
//! - **Narrative**: the Orchestrator optionally writes the final rationale
//!
//! ## Consensus
//!
//! The surviving opinions are merged into a weighted [`Differential`], scored
//! for agreement, and run through the [`EscalationPolicy`] that decides
//! whether a human must review the case. The result is a [`PanelReport`].

pub mod config;
pub mod consensus;
pub mod core;
pub mod evidence;
pub mod orchestration;
pub mod panel;
pub mod prompt;
pub mod report;

// Re-export commonly used types
pub use consensus::{
    AgreementScore, DEFAULT_ESCALATION_THRESHOLD, Differential, DifferentialEntry,
    EscalationDecision, EscalationInput, EscalationPolicy, EscalationReason, RoleWeights,
    compose_rationale, score_agreement, synthesize,
};
pub use config::OutputFormat;
pub use core::{
    case::{Case, ImagePayload},
    error::DomainError,
    string::normalize_label,
};
pub use evidence::EvidenceSnippet;
pub use orchestration::{PanelMode, PanelRun, PanelStage};
pub use panel::{
    AgentFailure, AgentPass, AgentResult, AgentRole, AgentStatus, CritiqueNote, ParseError,
    ParsedCritique, ParsedOpinion, RankedDiagnosis, Severity, parse_critique, parse_opinion,
};
pub use prompt::PanelPromptTemplate;
pub use report::{PanelReport, PanelStatus, PanelTrace, ReportParts, ReviewStatus};
