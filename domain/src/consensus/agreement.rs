//! Panel agreement scoring
//!
//! The panel agreement score is the share of contributing agents whose
//! top-ranked label is the differential's primary label, as a percentage
//! rounded half-up:
//!
//! ```text
//! score = round(100 × matching / contributing)
//! ```
//!
//! The arithmetic is done in integers so the score is reproducible exactly.

use super::differential::Differential;
use crate::core::string::normalize_label;
use crate::panel::AgentResult;
use serde::{Deserialize, Serialize};

/// Consensus measure among the surviving agents' top picks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementScore {
    /// 0–100
    pub score: u8,
    /// Agents whose top pick matches the primary diagnosis
    pub matching: usize,
    /// `Ok` first-pass agents with at least one diagnosis
    pub contributing: usize,
}

impl AgreementScore {
    /// Exactly one agent contributed; the score is trivially 100.
    pub fn is_single_agent(&self) -> bool {
        self.contributing == 1
    }

    pub fn is_unanimous(&self) -> bool {
        self.contributing > 0 && self.matching == self.contributing
    }
}

/// Score agreement of the contributing agents with the differential's head.
pub fn score_agreement(results: &[AgentResult], differential: &Differential) -> AgreementScore {
    let primary = &differential.primary().label;

    let contributing: Vec<&AgentResult> = results
        .iter()
        .filter(|r| r.role.is_first_pass() && r.contributes())
        .collect();

    let matching = contributing
        .iter()
        .filter(|r| {
            r.top_diagnosis()
                .is_some_and(|d| normalize_label(&d.label) == *primary)
        })
        .count();

    AgreementScore {
        score: percentage(matching, contributing.len()),
        matching,
        contributing: contributing.len(),
    }
}

/// `round_half_up(100 × part / whole)`, 0 when `whole` is 0.
///
/// A single contributor always scores 100: its top pick is by construction
/// the primary diagnosis unless a tie-break chose otherwise, and a lone
/// agent is defined to agree with itself.
fn percentage(part: usize, whole: usize) -> u8 {
    match whole {
        0 => 0,
        1 => 100,
        _ => ((200 * part + whole) / (2 * whole)).min(100) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{RoleWeights, synthesize};
    use crate::panel::{AgentFailure, AgentRole, RankedDiagnosis};
    use std::time::Duration;

    fn ok(role: AgentRole, diagnoses: &[(&str, f64)]) -> AgentResult {
        AgentResult::ok(
            role,
            diagnoses
                .iter()
                .map(|(l, c)| RankedDiagnosis::new(*l, *c))
                .collect(),
            "",
            Duration::ZERO,
        )
    }

    fn score(results: &[AgentResult]) -> AgreementScore {
        let differential = synthesize(results, &RoleWeights::default()).unwrap();
        score_agreement(results, &differential)
    }

    #[test]
    fn test_pneumonia_scenario_scores_fifty() {
        let results = vec![
            ok(AgentRole::Radiologist, &[("pneumonia", 0.8)]),
            ok(AgentRole::Internist, &[("bronchitis", 0.6), ("pneumonia", 0.4)]),
            AgentResult::failed(
                AgentRole::EvidenceReviewer,
                AgentFailure::Gateway("down".to_string()),
                Duration::ZERO,
            ),
        ];
        let agreement = score(&results);
        assert_eq!(agreement.score, 50);
        assert_eq!(agreement.matching, 1);
        assert_eq!(agreement.contributing, 2);
        assert!(!agreement.is_single_agent());
    }

    #[test]
    fn test_unanimous_scores_hundred() {
        let results = vec![
            ok(AgentRole::Radiologist, &[("pneumonia", 0.8)]),
            ok(AgentRole::Internist, &[("Pneumonia", 0.6)]),
            ok(AgentRole::EvidenceReviewer, &[("pneumonia ", 0.7)]),
        ];
        let agreement = score(&results);
        assert_eq!(agreement.score, 100);
        assert!(agreement.is_unanimous());
    }

    #[test]
    fn test_no_two_agree_scores_one_over_n() {
        let results = vec![
            ok(AgentRole::Radiologist, &[("a", 0.9)]),
            ok(AgentRole::Internist, &[("b", 0.5)]),
            ok(AgentRole::EvidenceReviewer, &[("c", 0.4)]),
        ];
        // 100 / 3 = 33.33 -> 33
        assert_eq!(score(&results).score, 33);
    }

    #[test]
    fn test_two_of_three_rounds_half_up() {
        let results = vec![
            ok(AgentRole::Radiologist, &[("a", 0.9)]),
            ok(AgentRole::Internist, &[("a", 0.9)]),
            ok(AgentRole::EvidenceReviewer, &[("c", 0.4)]),
        ];
        // 66.67 -> 67
        assert_eq!(score(&results).score, 67);
    }

    #[test]
    fn test_single_agent_is_trivially_hundred() {
        let results = vec![ok(AgentRole::Internist, &[("asthma", 0.2), ("copd", 0.1)])];
        let agreement = score(&results);
        assert_eq!(agreement.score, 100);
        assert!(agreement.is_single_agent());
    }

    #[test]
    fn test_empty_ok_agents_do_not_count() {
        let results = vec![
            ok(AgentRole::Radiologist, &[("a", 0.9)]),
            ok(AgentRole::Internist, &[]),
        ];
        let agreement = score(&results);
        assert_eq!(agreement.contributing, 1);
        assert_eq!(agreement.score, 100);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(0, 1), 100);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 8), 13); // 12.5 -> 13
        assert_eq!(percentage(0, 4), 0);
        assert_eq!(percentage(4, 4), 100);
    }

    #[test]
    fn test_score_always_in_range() {
        for whole in 0..20 {
            for part in 0..=whole {
                assert!(percentage(part, whole) <= 100);
            }
        }
    }
}
