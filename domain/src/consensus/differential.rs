//! Differential diagnosis and the synthesis that produces it
//!
//! Synthesis is pure: it groups the surviving first-pass diagnoses by
//! normalized label, weights each agent's confidence by its role weight and
//! averages over the agents that named the label.
//!
//! ```text
//! aggregate(label) = Σ weight(role) × confidence(role, label) / |contributors(label)|
//! ```
//!
//! Entries are ordered by descending aggregate confidence, ties broken by
//! label in lexical order, so identical inputs always yield identical output.

use super::weights::RoleWeights;
use crate::core::error::DomainError;
use crate::core::string::normalize_label;
use crate::panel::{AgentResult, AgentRole};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One candidate diagnosis in the merged ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentialEntry {
    /// Normalized label
    pub label: String,
    /// Weighted mean confidence in [0, 1]
    pub confidence: f64,
    /// Roles that named this label, in canonical role order
    pub supporting_roles: Vec<AgentRole>,
}

/// Merged ranking of candidate diagnoses
///
/// Labels are unique and entries are sorted by non-increasing confidence.
/// It is never empty: [`synthesize`] refuses to build an empty one, and
/// deserializing an empty list fails. Serializes as a plain list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<DifferentialEntry>", try_from = "Vec<DifferentialEntry>")]
pub struct Differential {
    entries: Vec<DifferentialEntry>,
}

impl TryFrom<Vec<DifferentialEntry>> for Differential {
    type Error = DomainError;

    fn try_from(entries: Vec<DifferentialEntry>) -> Result<Self, Self::Error> {
        if entries.is_empty() {
            return Err(DomainError::EmptyDifferential);
        }
        Ok(Self { entries })
    }
}

impl From<Differential> for Vec<DifferentialEntry> {
    fn from(differential: Differential) -> Self {
        differential.entries
    }
}

impl Differential {
    /// Head of the ranking
    pub fn primary(&self) -> &DifferentialEntry {
        &self.entries[0]
    }

    pub fn entries(&self) -> &[DifferentialEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&DifferentialEntry> {
        let label = normalize_label(label);
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DifferentialEntry> {
        self.entries.iter()
    }
}

/// Merge the surviving first-pass results into a [`Differential`].
///
/// Only `Ok` results from first-pass roles are considered; everything else
/// is ignored. An agent naming the same label twice counts once, with its
/// higher confidence.
///
/// # Errors
///
/// [`DomainError::EmptyDifferential`] when no surviving agent produced a
/// non-blank label.
pub fn synthesize(
    results: &[AgentResult],
    weights: &RoleWeights,
) -> Result<Differential, DomainError> {
    let mut contributors: Vec<&AgentResult> = results
        .iter()
        .filter(|r| r.role.is_first_pass() && r.is_ok())
        .collect();
    contributors.sort_by_key(|r| r.role);

    // label -> [(role, confidence)], roles pushed in canonical order
    let mut grouped: BTreeMap<String, Vec<(AgentRole, f64)>> = BTreeMap::new();

    for result in contributors {
        let mut per_agent: BTreeMap<String, f64> = BTreeMap::new();
        for diagnosis in &result.diagnoses {
            let label = normalize_label(&diagnosis.label);
            if label.is_empty() || !diagnosis.confidence.is_finite() {
                continue;
            }
            let confidence = diagnosis.confidence.clamp(0.0, 1.0);
            per_agent
                .entry(label)
                .and_modify(|c| *c = c.max(confidence))
                .or_insert(confidence);
        }
        for (label, confidence) in per_agent {
            grouped
                .entry(label)
                .or_default()
                .push((result.role, confidence));
        }
    }

    let mut entries: Vec<DifferentialEntry> = grouped
        .into_iter()
        .map(|(label, votes)| {
            let weighted_sum: f64 = votes
                .iter()
                .map(|(role, confidence)| weights.weight(*role) * confidence)
                .sum();
            DifferentialEntry {
                label,
                confidence: weighted_sum / votes.len() as f64,
                supporting_roles: votes.into_iter().map(|(role, _)| role).collect(),
            }
        })
        .collect();

    if entries.is_empty() {
        return Err(DomainError::EmptyDifferential);
    }

    entries.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.label.cmp(&b.label))
    });

    Ok(Differential { entries })
}

/// Join the surviving first-pass rationales in canonical role order.
pub fn compose_rationale(results: &[AgentResult]) -> String {
    let mut contributors: Vec<&AgentResult> = results
        .iter()
        .filter(|r| r.role.is_first_pass() && r.is_ok() && !r.rationale.trim().is_empty())
        .collect();
    contributors.sort_by_key(|r| r.role);

    contributors
        .iter()
        .map(|r| format!("{}: {}", r.role, r.rationale.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
