//! Types for the RunPanel use case.

use medpanel_domain::{AgentResult, AgentRole, CritiqueNote, DomainError, ReviewStatus};
use thiserror::Error;

/// Panel-wide conditions that end a run without a report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    #[error("Panel unavailable: no first-pass agent succeeded ({0})")]
    PanelUnavailable(String),

    #[error("Empty differential: surviving agents produced no diagnosis labels")]
    EmptyDifferential,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid case: {0}")]
    InvalidCase(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PanelError {
    pub fn kind(&self) -> &'static str {
        match self {
            PanelError::PanelUnavailable(_) => "panel_unavailable",
            PanelError::EmptyDifferential => "empty_differential",
            PanelError::InvalidConfig(_) => "invalid_config",
            PanelError::InvalidCase(_) => "invalid_case",
            PanelError::Internal(_) => "internal",
        }
    }
}

impl From<DomainError> for PanelError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::EmptyDifferential => PanelError::EmptyDifferential,
            DomainError::EmptyNotes | DomainError::EmptyImage | DomainError::InvalidCaseId(_) => {
                PanelError::InvalidCase(e.to_string())
            }
            DomainError::InvalidWeight { .. } | DomainError::InvalidThreshold(_) => {
                PanelError::InvalidConfig(e.to_string())
            }
            DomainError::InvalidTransition { .. } => PanelError::Internal(e.to_string()),
        }
    }
}

/// The finalized first-pass set
#[derive(Debug, Clone)]
pub struct FirstPass {
    /// One result per first-pass role, skipped roles included, in role order
    pub results: Vec<AgentResult>,
}

impl FirstPass {
    /// Roles actually invoked
    pub fn dispatched(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status != medpanel_domain::AgentStatus::Skipped)
            .count()
    }

    /// Invoked roles that failed or timed out
    pub fn degraded(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_degraded()).count()
    }

    pub fn surviving(&self) -> Vec<AgentResult> {
        self.results.iter().filter(|r| r.is_ok()).cloned().collect()
    }

    pub fn result_for(&self, role: AgentRole) -> Option<&AgentResult> {
        self.results.iter().find(|r| r.role == role)
    }
}

/// Outcome of the adversarial stage
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub result: AgentResult,
    /// Empty unless the review completed
    pub critique: Vec<CritiqueNote>,
    pub status: ReviewStatus,
}
