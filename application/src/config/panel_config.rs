//! Panel configuration.
//!
//! [`PanelConfig`] is the explicit configuration structure handed to
//! [`RunPanelUseCase`](crate::use_cases::run_panel::RunPanelUseCase) at
//! construction. Nothing in the pipeline reads global state.
//!
//! | Field | Default |
//! |-------|---------|
//! | `escalation_threshold` | 70 |
//! | `weights` | Radiologist 1.0, Internist 0.9, Evidence Reviewer 0.8 |
//! | `first_pass_roles` | all three first-pass roles |
//! | `case_deadline` | 120 s |
//! | `agent_timeout` | 90 s |
//! | `review_deadline` | 60 s |
//! | `adversarial_review` | on |
//! | `orchestrator_narrative` | off |
//! | `mode` | `Full` |
//! | `evidence_limit` | 5 |

use medpanel_domain::{
    AgentRole, DEFAULT_ESCALATION_THRESHOLD, DomainError, EscalationPolicy, PanelMode, RoleWeights,
};
use std::time::Duration;
use thiserror::Error;

/// One configuration violation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigIssue {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("no first-pass roles enabled")]
    NoFirstPassRoles,

    #[error("{0} is not a first-pass role")]
    NotFirstPass(AgentRole),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Panel run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Agreement below this escalates (0–100)
    pub escalation_threshold: u8,
    pub weights: RoleWeights,
    /// First-pass roles the coordinator may dispatch
    pub first_pass_roles: Vec<AgentRole>,
    /// Bound on the whole first pass
    pub case_deadline: Duration,
    /// Slice allotted to each first-pass agent
    pub agent_timeout: Duration,
    /// Slice for the adversarial review and the orchestrator narrative
    pub review_deadline: Duration,
    pub adversarial_review: bool,
    pub orchestrator_narrative: bool,
    pub mode: PanelMode,
    /// Maximum snippets handed to the Evidence Reviewer
    pub evidence_limit: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            escalation_threshold: DEFAULT_ESCALATION_THRESHOLD,
            weights: RoleWeights::default(),
            first_pass_roles: AgentRole::FIRST_PASS.to_vec(),
            case_deadline: Duration::from_secs(120),
            agent_timeout: Duration::from_secs(90),
            review_deadline: Duration::from_secs(60),
            adversarial_review: true,
            orchestrator_narrative: false,
            mode: PanelMode::Full,
            evidence_limit: 5,
        }
    }
}

impl PanelConfig {
    // ==================== Builder Methods ====================

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.escalation_threshold = threshold;
        self
    }

    pub fn with_weights(mut self, weights: RoleWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_first_pass_roles(mut self, roles: impl IntoIterator<Item = AgentRole>) -> Self {
        self.first_pass_roles = roles.into_iter().collect();
        self
    }

    pub fn with_case_deadline(mut self, deadline: Duration) -> Self {
        self.case_deadline = deadline;
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_review_deadline(mut self, deadline: Duration) -> Self {
        self.review_deadline = deadline;
        self
    }

    pub fn with_adversarial_review(mut self, enabled: bool) -> Self {
        self.adversarial_review = enabled;
        self
    }

    pub fn with_orchestrator_narrative(mut self, enabled: bool) -> Self {
        self.orchestrator_narrative = enabled;
        self
    }

    pub fn with_mode(mut self, mode: PanelMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_evidence_limit(mut self, limit: usize) -> Self {
        self.evidence_limit = limit;
        self
    }

    // ==================== Queries ====================

    /// Whether the coordinator dispatches `role` for this configuration
    pub fn dispatches(&self, role: AgentRole) -> bool {
        role.is_first_pass() && self.first_pass_roles.contains(&role) && self.mode.dispatches(role)
    }

    /// The escalation policy for the configured threshold
    pub fn escalation_policy(&self) -> Result<EscalationPolicy, DomainError> {
        EscalationPolicy::new(self.escalation_threshold)
    }

    /// Every violation, in field order. Empty means valid.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Err(e) = self.escalation_policy() {
            issues.push(e.into());
        }
        if let Err(e) = self.weights.validate() {
            issues.push(e.into());
        }
        if self.first_pass_roles.is_empty() {
            issues.push(ConfigIssue::NoFirstPassRoles);
        }
        for role in &self.first_pass_roles {
            if !role.is_first_pass() {
                issues.push(ConfigIssue::NotFirstPass(*role));
            }
        }
        for (name, value) in [
            ("case_deadline", self.case_deadline),
            ("agent_timeout", self.agent_timeout),
            ("review_deadline", self.review_deadline),
        ] {
            if value.is_zero() {
                issues.push(ConfigIssue::ZeroDuration(name));
            }
        }

        issues
    }
}
