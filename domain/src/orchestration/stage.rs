//! Pipeline stages and the run that walks through them

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a panel run
///
/// ```text
/// Created → Dispatching → Reviewing → Synthesizing → Scoring → Finalized
///                │                         │
///                └────────► Failed ◄───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelStage {
    Created,
    /// First-pass fan-out
    Dispatching,
    /// Adversarial review
    Reviewing,
    /// Differential and rationale
    Synthesizing,
    /// Agreement and escalation
    Scoring,
    Finalized,
    Failed,
}

impl PanelStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelStage::Created => "created",
            PanelStage::Dispatching => "dispatching",
            PanelStage::Reviewing => "reviewing",
            PanelStage::Synthesizing => "synthesizing",
            PanelStage::Scoring => "scoring",
            PanelStage::Finalized => "finalized",
            PanelStage::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PanelStage::Created => "Created",
            PanelStage::Dispatching => "First-pass Dispatch",
            PanelStage::Reviewing => "Adversarial Review",
            PanelStage::Synthesizing => "Synthesis",
            PanelStage::Scoring => "Scoring",
            PanelStage::Finalized => "Finalized",
            PanelStage::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PanelStage::Finalized | PanelStage::Failed)
    }

    /// Whether `self → next` is a legal transition
    pub fn can_transition_to(&self, next: PanelStage) -> bool {
        use PanelStage::*;
        matches!(
            (self, next),
            (Created, Dispatching)
                | (Dispatching, Reviewing)
                | (Dispatching, Failed)
                | (Reviewing, Synthesizing)
                | (Synthesizing, Scoring)
                | (Synthesizing, Failed)
                | (Scoring, Finalized)
        )
    }
}

impl fmt::Display for PanelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tracks the stage of one panel run (Entity)
#[derive(Debug, Clone)]
pub struct PanelRun {
    case_id: String,
    stage: PanelStage,
    history: Vec<PanelStage>,
}

impl PanelRun {
    pub fn new(case_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            stage: PanelStage::Created,
            history: vec![PanelStage::Created],
        }
    }

    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    pub fn stage(&self) -> PanelStage {
        self.stage
    }

    /// Every stage visited, in order
    pub fn history(&self) -> &[PanelStage] {
        &self.history
    }

    pub fn advance(&mut self, next: PanelStage) -> Result<(), DomainError> {
        if !self.stage.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.stage.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.stage = next;
        self.history.push(next);
        Ok(())
    }
}
