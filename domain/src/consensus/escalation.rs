//! Escalation policy
//!
//! Decides whether a case goes to a human reviewer. The rules are checked
//! in priority order and the first match wins:
//!
//! | # | Condition | Reason |
//! |---|-----------|--------|
//! | 1 | A `Critical` critique references the primary diagnosis | [`EscalationReason::CriticalCritique`] |
//! | 2 | Agreement score below the threshold | [`EscalationReason::LowAgreement`] |
//! | 3 | More than half of the dispatched first-pass agents failed or timed out | [`EscalationReason::DegradedPanel`] |
//! | 4 | Otherwise | no escalation |

use crate::core::error::DomainError;
use crate::panel::CritiqueNote;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default agreement threshold below which a case escalates
pub const DEFAULT_ESCALATION_THRESHOLD: u8 = 70;

/// Which policy rule triggered escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    CriticalCritique,
    LowAgreement,
    DegradedPanel,
}

impl EscalationReason {
    pub fn description(&self) -> &'static str {
        match self {
            EscalationReason::CriticalCritique => {
                "critical concern raised against the primary diagnosis"
            }
            EscalationReason::LowAgreement => "panel agreement below threshold",
            EscalationReason::DegradedPanel => {
                "more than half of the first-pass agents failed or timed out"
            }
        }
    }
}

impl fmt::Display for EscalationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Everything the policy looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationInput {
    pub agreement_score: u8,
    /// A `Critical` critique references the primary diagnosis
    pub critical_on_primary: bool,
    /// First-pass agents actually invoked
    pub dispatched: usize,
    /// Dispatched first-pass agents that failed or timed out
    pub degraded: usize,
}

impl EscalationInput {
    /// Derive the critique flag from the notes and the primary label.
    pub fn new(
        agreement_score: u8,
        critique: &[CritiqueNote],
        primary_label: &str,
        dispatched: usize,
        degraded: usize,
    ) -> Self {
        Self {
            agreement_score,
            critical_on_primary: critique
                .iter()
                .any(|n| n.is_critical() && n.references(primary_label)),
            dispatched,
            degraded,
        }
    }
}

/// The policy's verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationDecision {
    pub escalate: bool,
    pub reason: Option<EscalationReason>,
}

impl EscalationDecision {
    fn escalate(reason: EscalationReason) -> Self {
        Self {
            escalate: true,
            reason: Some(reason),
        }
    }

    fn proceed() -> Self {
        Self {
            escalate: false,
            reason: None,
        }
    }
}

/// Escalation thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    threshold: u8,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ESCALATION_THRESHOLD,
        }
    }
}

impl EscalationPolicy {
    pub fn new(threshold: u8) -> Result<Self, DomainError> {
        if threshold > 100 {
            return Err(DomainError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Apply the rules in priority order. Pure and total.
    pub fn decide(&self, input: &EscalationInput) -> EscalationDecision {
        if input.critical_on_primary {
            return EscalationDecision::escalate(EscalationReason::CriticalCritique);
        }
        if input.agreement_score < self.threshold {
            return EscalationDecision::escalate(EscalationReason::LowAgreement);
        }
        if input.degraded * 2 > input.dispatched {
            return EscalationDecision::escalate(EscalationReason::DegradedPanel);
        }
        EscalationDecision::proceed()
    }
}
