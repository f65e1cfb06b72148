//! Agent invocation results
//!
//! Every agent invocation yields exactly one [`AgentResult`], whatever
//! happened during the call. Failures are values here, not errors.

use super::critique::CritiqueNote;
use super::role::AgentRole;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// One (label, confidence) pair from an agent's ranked list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDiagnosis {
    pub label: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl RankedDiagnosis {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Outcome tag of an agent invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentStatus {
    Ok,
    TimedOut,
    Failed,
    /// Not invoked for this case (disabled, or not applicable in this mode)
    Skipped,
}

impl AgentStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, AgentStatus::Ok)
    }

    /// Dispatched but produced nothing usable
    pub fn is_degraded(&self) -> bool {
        matches!(self, AgentStatus::TimedOut | AgentStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Ok => "ok",
            AgentStatus::TimedOut => "timed_out",
            AgentStatus::Failed => "failed",
            AgentStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why an agent did not return `Ok`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AgentFailure {
    /// The role needs part of the case the case does not have
    MissingInput(String),
    /// The deadline elapsed before the inference call returned
    TimedOut { after_ms: u64 },
    /// The case deadline elapsed and the call was abandoned
    Cancelled,
    /// The inference capability returned an error
    Gateway(String),
    /// The inference output could not be interpreted
    MalformedResponse(String),
}

impl AgentFailure {
    /// Status this failure is reported under
    pub fn status(&self) -> AgentStatus {
        match self {
            AgentFailure::TimedOut { .. } | AgentFailure::Cancelled => AgentStatus::TimedOut,
            AgentFailure::MissingInput(_)
            | AgentFailure::Gateway(_)
            | AgentFailure::MalformedResponse(_) => AgentStatus::Failed,
        }
    }
}

impl fmt::Display for AgentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentFailure::MissingInput(what) => write!(f, "missing input: {}", what),
            AgentFailure::TimedOut { after_ms } => write!(f, "timed out after {}ms", after_ms),
            AgentFailure::Cancelled => write!(f, "cancelled at case deadline"),
            AgentFailure::Gateway(e) => write!(f, "inference error: {}", e),
            AgentFailure::MalformedResponse(e) => write!(f, "malformed response: {}", e),
        }
    }
}

/// Output of one agent invocation
///
/// Produced exactly once per agent per case and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub role: AgentRole,
    pub status: AgentStatus,
    /// Ranked by descending confidence; empty unless `status` is `Ok`
    pub diagnoses: Vec<RankedDiagnosis>,
    pub rationale: String,
    /// Concerns raised; only the adversarial role produces these
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub critique: Vec<CritiqueNote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<AgentFailure>,
    pub elapsed_ms: u64,
}

impl AgentResult {
    /// A successful invocation
    pub fn ok(
        role: AgentRole,
        diagnoses: Vec<RankedDiagnosis>,
        rationale: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            role,
            status: AgentStatus::Ok,
            diagnoses,
            rationale: rationale.into(),
            critique: Vec::new(),
            failure: None,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// A failed or timed-out invocation; the status follows the failure kind
    pub fn failed(role: AgentRole, failure: AgentFailure, elapsed: Duration) -> Self {
        Self {
            role,
            status: failure.status(),
            diagnoses: Vec::new(),
            rationale: String::new(),
            critique: Vec::new(),
            failure: Some(failure),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// A role that was not invoked for this case
    pub fn skipped(role: AgentRole) -> Self {
        Self {
            role,
            status: AgentStatus::Skipped,
            diagnoses: Vec::new(),
            rationale: String::new(),
            critique: Vec::new(),
            failure: None,
            elapsed_ms: 0,
        }
    }

    /// Attach critique notes (adversarial role)
    pub fn with_critique(mut self, critique: Vec<CritiqueNote>) -> Self {
        self.critique = critique;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    /// Head of the ranked list
    pub fn top_diagnosis(&self) -> Option<&RankedDiagnosis> {
        self.diagnoses.first()
    }

    /// An `Ok` result with at least one labeled diagnosis
    pub fn contributes(&self) -> bool {
        self.is_ok() && !self.diagnoses.is_empty()
    }
}
