//! The panel's final artifact.
//!
//! - [`PanelReport`]: the consolidated decision returned to callers
//! - [`PanelStatus`]: coverage notes (degraded agents, single-agent panel, review outcome)
//! - [`trace::PanelTrace`]: per-agent detail kept out of the report

pub mod trace;

pub use trace::PanelTrace;

use crate::consensus::{
    AgreementScore, Differential, DifferentialEntry, EscalationDecision, EscalationReason,
};
use crate::panel::{AgentResult, AgentRole, AgentStatus, CritiqueNote};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of the adversarial stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Completed,
    /// Ran but failed or timed out; no critique is available
    Unavailable,
    /// Disabled by configuration
    Skipped,
}

/// Coverage notes attached to a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelStatus {
    /// Agreement rests on a single agent and is trivially 100
    pub single_agent_panel: bool,
    pub adversarial_review: ReviewStatus,
    /// Dispatched roles that failed or timed out, in canonical order
    pub degraded_roles: Vec<AgentRole>,
    /// Human-readable notes, one per noteworthy condition
    pub notes: Vec<String>,
}

impl PanelStatus {
    /// Full coverage: nothing degraded, review completed, several agents
    pub fn is_complete(&self) -> bool {
        !self.single_agent_panel
            && self.adversarial_review == ReviewStatus::Completed
            && self.degraded_roles.is_empty()
    }
}

/// Pieces the pipeline hands over to build a report
pub struct ReportParts<'a> {
    pub case_id: &'a str,
    pub differential: Differential,
    pub agreement: AgreementScore,
    pub decision: EscalationDecision,
    pub critique_notes: Vec<CritiqueNote>,
    /// Every result of the run, adversarial and narrative included
    pub results: &'a [AgentResult],
    pub review: ReviewStatus,
    pub rationale: String,
    /// Extra notes from the pipeline, appended after the derived ones
    pub notes: Vec<String>,
}

/// Consolidated panel decision (Value Object)
///
/// Built once from a differential over `Ok` agents and never mutated.
/// Field names are the contract with callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelReport {
    case_id: String,
    primary_diagnosis: String,
    differential: Differential,
    panel_agreement_score: u8,
    escalate_to_human: bool,
    escalation_reason: Option<EscalationReason>,
    critique_notes: Vec<CritiqueNote>,
    agent_status: BTreeMap<AgentRole, AgentStatus>,
    rationale: String,
    status: PanelStatus,
}

impl PanelReport {
    pub fn assemble(parts: ReportParts<'_>) -> Self {
        let mut agent_status: BTreeMap<AgentRole, AgentStatus> = AgentRole::ALL
            .iter()
            .map(|role| (*role, AgentStatus::Skipped))
            .collect();
        for result in parts.results {
            agent_status.insert(result.role, result.status);
        }

        let mut degraded: Vec<&AgentResult> = parts
            .results
            .iter()
            .filter(|r| r.role.is_first_pass() && r.status.is_degraded())
            .collect();
        degraded.sort_by_key(|r| r.role);

        let mut notes: Vec<String> = degraded
            .iter()
            .map(|r| match &r.failure {
                Some(failure) => format!("{} {}: {}", r.role, r.status, failure),
                None => format!("{} {}", r.role, r.status),
            })
            .collect();

        let single_agent_panel = parts.agreement.is_single_agent();
        if single_agent_panel {
            notes.push(
                "single-agent panel: agreement score is trivially 100".to_string(),
            );
        }
        if parts.review == ReviewStatus::Unavailable {
            let detail = parts
                .results
                .iter()
                .find(|r| r.role == AgentRole::DevilsAdvocate)
                .and_then(|r| r.failure.as_ref())
                .map(|f| format!(": {}", f))
                .unwrap_or_default();
            notes.push(format!("adversarial review unavailable{}", detail));
        }
        notes.extend(parts.notes);

        Self {
            case_id: parts.case_id.to_string(),
            primary_diagnosis: parts.differential.primary().label.clone(),
            differential: parts.differential,
            panel_agreement_score: parts.agreement.score,
            escalate_to_human: parts.decision.escalate,
            escalation_reason: parts.decision.reason,
            critique_notes: parts.critique_notes,
            agent_status,
            rationale: parts.rationale,
            status: PanelStatus {
                single_agent_panel,
                adversarial_review: parts.review,
                degraded_roles: degraded.iter().map(|r| r.role).collect(),
                notes,
            },
        }
    }

    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    pub fn primary_diagnosis(&self) -> &str {
        &self.primary_diagnosis
    }

    pub fn primary(&self) -> &DifferentialEntry {
        self.differential.primary()
    }

    pub fn differential(&self) -> &Differential {
        &self.differential
    }

    pub fn panel_agreement_score(&self) -> u8 {
        self.panel_agreement_score
    }

    pub fn escalate_to_human(&self) -> bool {
        self.escalate_to_human
    }

    pub fn escalation_reason(&self) -> Option<EscalationReason> {
        self.escalation_reason
    }

    pub fn critique_notes(&self) -> &[CritiqueNote] {
        &self.critique_notes
    }

    pub fn agent_status(&self) -> &BTreeMap<AgentRole, AgentStatus> {
        &self.agent_status
    }

    pub fn status_of(&self, role: AgentRole) -> AgentStatus {
        self.agent_status
            .get(&role)
            .copied()
            .unwrap_or(AgentStatus::Skipped)
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn status(&self) -> &PanelStatus {
        &self.status
    }
}
