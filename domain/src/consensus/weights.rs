//! Per-role weight table used by synthesis

use crate::core::error::DomainError;
use crate::panel::AgentRole;
use serde::{Deserialize, Serialize};

/// Weight applied to each first-pass role's confidences
///
/// Weights are configuration, not engine logic. Each must lie in (0, 1]
/// so that aggregate confidences stay within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleWeights {
    pub radiologist: f64,
    pub internist: f64,
    pub evidence_reviewer: f64,
}

impl Default for RoleWeights {
    fn default() -> Self {
        Self {
            radiologist: 1.0,
            internist: 0.9,
            evidence_reviewer: 0.8,
        }
    }
}

impl RoleWeights {
    /// Every first-pass role weighted 1.0
    pub fn uniform() -> Self {
        Self {
            radiologist: 1.0,
            internist: 1.0,
            evidence_reviewer: 1.0,
        }
    }

    /// Weight for `role`; roles outside the first pass never contribute
    pub fn weight(&self, role: AgentRole) -> f64 {
        match role {
            AgentRole::Radiologist => self.radiologist,
            AgentRole::Internist => self.internist,
            AgentRole::EvidenceReviewer => self.evidence_reviewer,
            AgentRole::DevilsAdvocate | AgentRole::Orchestrator => 0.0,
        }
    }

    pub fn with_weight(mut self, role: AgentRole, weight: f64) -> Self {
        match role {
            AgentRole::Radiologist => self.radiologist = weight,
            AgentRole::Internist => self.internist = weight,
            AgentRole::EvidenceReviewer => self.evidence_reviewer = weight,
            AgentRole::DevilsAdvocate | AgentRole::Orchestrator => {}
        }
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for role in AgentRole::FIRST_PASS {
            let weight = self.weight(role);
            if !(weight > 0.0 && weight <= 1.0) {
                return Err(DomainError::InvalidWeight {
                    role: role.to_string(),
                    weight,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RoleWeights::default().validate().is_ok());
        assert!(RoleWeights::uniform().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_weights_rejected() {
        let zero = RoleWeights::default().with_weight(AgentRole::Internist, 0.0);
        assert!(matches!(
            zero.validate(),
            Err(DomainError::InvalidWeight { .. })
        ));

        let above = RoleWeights::default().with_weight(AgentRole::Radiologist, 1.5);
        assert!(above.validate().is_err());

        let nan = RoleWeights::default().with_weight(AgentRole::EvidenceReviewer, f64::NAN);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_non_first_pass_roles_have_zero_weight() {
        let weights = RoleWeights::default();
        assert_eq!(weights.weight(AgentRole::DevilsAdvocate), 0.0);
        assert_eq!(weights.weight(AgentRole::Orchestrator), 0.0);
    }

    #[test]
    fn test_deserialize_partial() {
        let weights: RoleWeights = serde_json::from_str(r#"{"radiologist": 0.7}"#).unwrap();
        assert_eq!(weights.radiologist, 0.7);
        assert_eq!(weights.internist, RoleWeights::default().internist);
    }
}
