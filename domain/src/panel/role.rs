//! Agent roles
//!
//! The five panel personas are a closed enumeration. Everything that differs
//! between them (which parts of the case they see, which pass they run in)
//! is plain data attached to each variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which stage of the panel a role participates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPass {
    /// Concurrent, independent diagnosis
    FirstPass,
    /// Sequential critique of the first-pass outputs
    Adversarial,
    /// Optional narrative over the synthesized differential
    Narrative,
}

/// A specialist persona on the diagnostic panel
///
/// Declaration order is the canonical role order: maps keyed by role and
/// any per-role iteration follow it, which keeps reports deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    /// Reads the image, with the notes as clinical history
    Radiologist,
    /// Reasons from the clinical notes
    Internist,
    /// Reasons from the notes plus retrieved literature
    EvidenceReviewer,
    /// Critiques the first-pass conclusions
    DevilsAdvocate,
    /// Writes the panel narrative over the synthesized differential
    Orchestrator,
}

impl AgentRole {
    /// All roles in canonical order
    pub const ALL: [AgentRole; 5] = [
        AgentRole::Radiologist,
        AgentRole::Internist,
        AgentRole::EvidenceReviewer,
        AgentRole::DevilsAdvocate,
        AgentRole::Orchestrator,
    ];

    /// Roles that run concurrently in the first pass
    pub const FIRST_PASS: [AgentRole; 3] = [
        AgentRole::Radiologist,
        AgentRole::Internist,
        AgentRole::EvidenceReviewer,
    ];

    pub fn pass(&self) -> AgentPass {
        match self {
            AgentRole::Radiologist | AgentRole::Internist | AgentRole::EvidenceReviewer => {
                AgentPass::FirstPass
            }
            AgentRole::DevilsAdvocate => AgentPass::Adversarial,
            AgentRole::Orchestrator => AgentPass::Narrative,
        }
    }

    pub fn is_first_pass(&self) -> bool {
        self.pass() == AgentPass::FirstPass
    }

    /// The role cannot run without an image.
    pub fn requires_image(&self) -> bool {
        matches!(self, AgentRole::Radiologist)
    }

    /// The image is forwarded to the inference call.
    pub fn sees_image(&self) -> bool {
        self.requires_image()
    }

    /// The role receives earlier agents' results as context.
    pub fn consumes_prior_results(&self) -> bool {
        matches!(self, AgentRole::DevilsAdvocate | AgentRole::Orchestrator)
    }

    /// The role's prompt is enriched by the evidence retriever.
    pub fn uses_evidence(&self) -> bool {
        matches!(self, AgentRole::EvidenceReviewer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Radiologist => "radiologist",
            AgentRole::Internist => "internist",
            AgentRole::EvidenceReviewer => "evidence_reviewer",
            AgentRole::DevilsAdvocate => "devils_advocate",
            AgentRole::Orchestrator => "orchestrator",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentRole::Radiologist => "Radiologist",
            AgentRole::Internist => "Internist",
            AgentRole::EvidenceReviewer => "Evidence Reviewer",
            AgentRole::DevilsAdvocate => "Devil's Advocate",
            AgentRole::Orchestrator => "Orchestrator",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "radiologist" => Ok(AgentRole::Radiologist),
            "internist" => Ok(AgentRole::Internist),
            "evidencereviewer" | "evidence" => Ok(AgentRole::EvidenceReviewer),
            "devilsadvocate" | "adversary" => Ok(AgentRole::DevilsAdvocate),
            "orchestrator" => Ok(AgentRole::Orchestrator),
            _ => Err(format!(
                "Unknown agent role: {}. Valid: radiologist, internist, evidence_reviewer, devils_advocate, orchestrator",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passes() {
        for role in AgentRole::FIRST_PASS {
            assert!(role.is_first_pass());
        }
        assert_eq!(AgentRole::DevilsAdvocate.pass(), AgentPass::Adversarial);
        assert_eq!(AgentRole::Orchestrator.pass(), AgentPass::Narrative);
    }

    #[test]
    fn test_input_requirements() {
        assert!(AgentRole::Radiologist.requires_image());
        assert!(!AgentRole::Internist.requires_image());
        assert!(AgentRole::DevilsAdvocate.consumes_prior_results());
        assert!(!AgentRole::Internist.consumes_prior_results());
        assert!(AgentRole::EvidenceReviewer.uses_evidence());
    }

    #[test]
    fn test_parse_role() {
        assert_eq!("Radiologist".parse::<AgentRole>().ok(), Some(AgentRole::Radiologist));
        assert_eq!(
            "evidence_reviewer".parse::<AgentRole>().ok(),
            Some(AgentRole::EvidenceReviewer)
        );
        assert_eq!(
            "Devil's Advocate".parse::<AgentRole>().ok(),
            Some(AgentRole::DevilsAdvocate)
        );
        assert!("surgeon".parse::<AgentRole>().is_err());
    }

    #[test]
    fn test_canonical_order() {
        let mut roles = vec![
            AgentRole::Orchestrator,
            AgentRole::Internist,
            AgentRole::Radiologist,
        ];
        roles.sort();
        assert_eq!(
            roles,
            vec![
                AgentRole::Radiologist,
                AgentRole::Internist,
                AgentRole::Orchestrator
            ]
        );
    }

    #[test]
    fn test_serde_uses_variant_names() {
        let json = serde_json::to_string(&AgentRole::EvidenceReviewer).unwrap();
        assert_eq!(json, "\"EvidenceReviewer\"");
    }
}
