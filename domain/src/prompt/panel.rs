//! Prompt templates for each panel role

use crate::consensus::Differential;
use crate::core::string::truncate;
use crate::evidence::EvidenceSnippet;
use crate::panel::{AgentResult, AgentRole, CritiqueNote};

const EXCERPT_LIMIT: usize = 1200;

const DIAGNOSIS_FORMAT: &str = r#"Respond with a single JSON object and nothing else:

{"diagnoses": [{"label": "<diagnosis>", "confidence": <0.0-1.0>}], "rationale": "<2-4 sentences>"}

List at most five diagnoses, most likely first."#;

const CRITIQUE_FORMAT: &str = r#"Respond with a single JSON object and nothing else:

{"concerns": [{"concern": "<what is missing or contradictory>", "severity": "info|warning|critical", "referenced_labels": ["<diagnosis>"]}], "rationale": "<overall assessment>"}

Use "critical" only when a conclusion could cause harm if acted upon. Return an empty list if you find nothing."#;

/// Templates for every role's system and user prompts
pub struct PanelPromptTemplate;

impl PanelPromptTemplate {
    /// System prompt for a role
    pub fn system(role: AgentRole) -> &'static str {
        match role {
            AgentRole::Radiologist => {
                r#"You are a board-certified radiologist on a diagnostic panel.
Interpret the attached image in light of the clinical history.
Report only findings you can support from the image and state uncertainty honestly."#
            }
            AgentRole::Internist => {
                r#"You are an experienced internist on a diagnostic panel.
Reason from the history, symptoms and examination findings in the clinical notes.
Consider common and dangerous causes before rare ones."#
            }
            AgentRole::EvidenceReviewer => {
                r#"You are an evidence-based medicine specialist on a diagnostic panel.
Weigh the clinical notes against the supplied literature excerpts.
Prefer diagnoses the evidence supports and say when it does not."#
            }
            AgentRole::DevilsAdvocate => {
                r#"You are the devil's advocate on a diagnostic panel.
Your job is to find omissions, contradictions and unsafe conclusions in the other members' assessments.
Do not propose your own differential; critique theirs."#
            }
            AgentRole::Orchestrator => {
                r#"You chair a diagnostic panel.
Summarize the panel's reasoning for a clinician in plain prose.
Do not change the ranking you are given."#
            }
        }
    }

    /// User prompt for a first-pass role
    pub fn first_pass(role: AgentRole, notes: &str, evidence: &[EvidenceSnippet]) -> String {
        let mut prompt = String::new();

        if role.sees_image() {
            prompt.push_str("An image from this case is attached.\n\n");
        }

        prompt.push_str(&format!("Clinical notes:\n{}\n", notes.trim()));

        if role.uses_evidence() {
            if evidence.is_empty() {
                prompt.push_str("\nNo literature excerpts were retrieved for this case.\n");
            } else {
                prompt.push_str("\nLiterature excerpts:\n");
                for (i, snippet) in evidence.iter().enumerate() {
                    prompt.push_str(&format!(
                        "\n[{}] {}\n{}\n",
                        i + 1,
                        snippet.source,
                        truncate(snippet.excerpt.trim(), EXCERPT_LIMIT)
                    ));
                }
            }
        }

        prompt.push('\n');
        prompt.push_str(DIAGNOSIS_FORMAT);
        prompt
    }

    /// User prompt for the Devil's Advocate
    pub fn adversarial(notes: &str, first_pass: &[AgentResult]) -> String {
        let mut prompt = format!("Clinical notes:\n{}\n\nPanel assessments:\n", notes.trim());

        for result in first_pass.iter().filter(|r| r.is_ok()) {
            prompt.push_str(&format!("\n--- {} ---\n", result.role));
            for d in &result.diagnoses {
                prompt.push_str(&format!("- {} ({:.2})\n", d.label, d.confidence));
            }
            if !result.rationale.is_empty() {
                prompt.push_str(&format!("Rationale: {}\n", result.rationale));
            }
        }

        prompt.push('\n');
        prompt.push_str(CRITIQUE_FORMAT);
        prompt
    }

    /// User prompt for the Orchestrator's narrative
    pub fn narrative(
        notes: &str,
        differential: &Differential,
        first_pass: &[AgentResult],
        critique: &[CritiqueNote],
    ) -> String {
        let mut prompt = format!("Clinical notes:\n{}\n\nPanel ranking:\n", notes.trim());

        for (i, entry) in differential.iter().enumerate() {
            let roles = entry
                .supporting_roles
                .iter()
                .map(|r| r.display_name())
                .collect::<Vec<_>>()
                .join(", ");
            prompt.push_str(&format!(
                "{}. {} ({:.2}; {})\n",
                i + 1,
                entry.label,
                entry.confidence,
                roles
            ));
        }

        prompt.push_str("\nMember rationales:\n");
        for result in first_pass.iter().filter(|r| r.is_ok() && !r.rationale.is_empty()) {
            prompt.push_str(&format!("- {}: {}\n", result.role, result.rationale));
        }

        if !critique.is_empty() {
            prompt.push_str("\nConcerns raised:\n");
            for note in critique {
                prompt.push_str(&format!("- [{}] {}\n", note.severity, note.concern));
            }
        }

        prompt.push_str("\nWrite the panel rationale in one or two short paragraphs of plain text.");
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{RoleWeights, synthesize};
    use crate::panel::{RankedDiagnosis, Severity};
    use std::time::Duration;

    #[test]
    fn test_first_pass_mentions_image_only_for_radiologist() {
        let radiology = PanelPromptTemplate::first_pass(AgentRole::Radiologist, "cough", &[]);
        let internal = PanelPromptTemplate::first_pass(AgentRole::Internist, "cough", &[]);
        assert!(radiology.contains("image"));
        assert!(!internal.contains("image from this case"));
        assert!(internal.contains("\"diagnoses\""));
    }

    #[test]
    fn test_evidence_included_for_reviewer() {
        let evidence = vec![EvidenceSnippet::new("cap-guideline.md", "CURB-65 ...", 2.0)];
        let prompt = PanelPromptTemplate::first_pass(AgentRole::EvidenceReviewer, "fever", &evidence);
        assert!(prompt.contains("[1] cap-guideline.md"));
        assert!(prompt.contains("CURB-65"));

        let empty = PanelPromptTemplate::first_pass(AgentRole::EvidenceReviewer, "fever", &[]);
        assert!(empty.contains("No literature excerpts"));

        let internist = PanelPromptTemplate::first_pass(AgentRole::Internist, "fever", &evidence);
        assert!(!internist.contains("CURB-65"));
    }

    #[test]
    fn test_adversarial_lists_ok_results() {
        let results = vec![AgentResult::ok(
            AgentRole::Internist,
            vec![RankedDiagnosis::new("bronchitis", 0.6)],
            "cough without consolidation",
            Duration::ZERO,
        )];
        let prompt = PanelPromptTemplate::adversarial("cough, fever", &results);
        assert!(prompt.contains("--- Internist ---"));
        assert!(prompt.contains("- bronchitis (0.60)"));
        assert!(prompt.contains("\"concerns\""));
    }

    #[test]
    fn test_narrative_includes_ranking_and_concerns() {
        let results = vec![AgentResult::ok(
            AgentRole::Internist,
            vec![RankedDiagnosis::new("asthma", 0.5)],
            "wheeze",
            Duration::ZERO,
        )];
        let differential = synthesize(&results, &RoleWeights::uniform()).unwrap();
        let critique = vec![CritiqueNote::new("check spirometry", Severity::Info, ["asthma"])];
        let prompt = PanelPromptTemplate::narrative("wheeze", &differential, &results, &critique);
        assert!(prompt.contains("1. asthma (0.50; Internist)"));
        assert!(prompt.contains("[info] check spirometry"));
    }
}
