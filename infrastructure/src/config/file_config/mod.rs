//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod evidence;
mod inference;
mod logging;
mod output;
mod panel;

pub use evidence::FileEvidenceConfig;
pub use inference::FileInferenceConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use panel::{FilePanelConfig, FileTimeoutsConfig};

use medpanel_application::PanelConfig;
use medpanel_domain::RoleWeights;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("unknown role in [panel].roles: {0}")]
    UnknownRole(String),

    #[error("[inference].base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("{0}")]
    Panel(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Escalation threshold, roles and stage switches
    pub panel: FilePanelConfig,
    /// Deadlines in seconds
    pub timeouts: FileTimeoutsConfig,
    /// Per-role synthesis weights
    pub weights: RoleWeights,
    /// Inference endpoint and models
    pub inference: FileInferenceConfig,
    /// Literature retrieval for the Evidence Reviewer
    pub evidence: FileEvidenceConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the file-level fields, stopping at the first problem.
    ///
    /// Panel-level rules (threshold range, weights) are checked by
    /// [`to_panel_config`](Self::to_panel_config).
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (name, seconds) in [
            ("timeouts.case_deadline_seconds", self.timeouts.case_deadline_seconds),
            ("timeouts.agent_seconds", self.timeouts.agent_seconds),
            ("timeouts.review_seconds", self.timeouts.review_seconds),
        ] {
            if seconds == 0 {
                return Err(ConfigValidationError::InvalidTimeout(name));
            }
        }

        if self.inference.model.trim().is_empty()
            || self.inference.role_models.values().any(|m| m.trim().is_empty())
        {
            return Err(ConfigValidationError::EmptyModelName);
        }

        if self.inference.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }

        if let Some(name) = self.panel.parse_roles().1.into_iter().next() {
            return Err(ConfigValidationError::UnknownRole(name));
        }

        Ok(())
    }

    /// Build the validated panel configuration.
    pub fn to_panel_config(&self) -> Result<PanelConfig, ConfigValidationError> {
        self.validate()?;

        let (roles, _) = self.panel.parse_roles();
        let config = PanelConfig::default()
            .with_threshold(self.panel.escalation_threshold)
            .with_weights(self.weights)
            .with_first_pass_roles(roles)
            .with_case_deadline(self.timeouts.case_deadline())
            .with_agent_timeout(self.timeouts.agent_timeout())
            .with_review_deadline(self.timeouts.review_deadline())
            .with_adversarial_review(self.panel.adversarial_review)
            .with_orchestrator_narrative(self.panel.orchestrator_narrative)
            .with_mode(self.panel.mode.unwrap_or_default())
            .with_evidence_limit(self.evidence.max_snippets);

        let issues = config.validate();
        if !issues.is_empty() {
            return Err(ConfigValidationError::Panel(
                issues
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medpanel_domain::{AgentRole, OutputFormat, PanelMode};
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[panel]
escalation_threshold = 80
roles = ["radiologist", "internist"]
adversarial_review = false
mode = "text-only"

[timeouts]
case_deadline_seconds = 30
agent_seconds = 20

[weights]
radiologist = 0.95
internist = 0.85

[inference]
base_url = "http://localhost:8000/v1"
model = "llava"

[evidence]
directory = "/srv/literature"

[output]
format = "json"
color = false

[logging]
report_log = "reports.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.panel.escalation_threshold, 80);
        assert_eq!(config.panel.mode, Some(PanelMode::TextOnly));
        assert_eq!(config.timeouts.agent_seconds, 20);
        // unset field keeps its default
        assert_eq!(config.timeouts.review_seconds, 60);
        assert_eq!(config.weights.internist, 0.85);
        assert_eq!(config.weights.evidence_reviewer, 0.8);
        assert_eq!(config.inference.model, "llava");
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert!(config.logging.report_log.is_some());

        let panel = config.to_panel_config().unwrap();
        assert_eq!(panel.escalation_threshold, 80);
        assert_eq!(
            panel.first_pass_roles,
            vec![AgentRole::Radiologist, AgentRole::Internist]
        );
        assert_eq!(panel.case_deadline, Duration::from_secs(30));
        assert!(!panel.adversarial_review);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.to_panel_config().unwrap(), PanelConfig::default());
        assert!(config.output.format.is_none());
        assert!(config.evidence.directory.is_none());
        assert!(config.panel.mode.is_none());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let toml_str = r#"
[timeouts]
agent_seconds = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout("timeouts.agent_seconds"))
        );
    }

    #[test]
    fn test_validate_unknown_role() {
        let toml_str = r#"
[panel]
roles = ["internist", "pathologist"]
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::UnknownRole("pathologist".to_string()))
        );
    }

    #[test]
    fn test_validate_empty_model_name() {
        let toml_str = r#"
[inference.role_models]
radiologist = "  "
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModelName));
    }

    #[test]
    fn test_panel_rules_checked_on_conversion() {
        let toml_str = r#"
[panel]
escalation_threshold = 120

[weights]
radiologist = 1.5
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        let err = config.to_panel_config().unwrap_err();
        assert!(matches!(err, ConfigValidationError::Panel(ref m) if m.contains("120") && m.contains("Radiologist")));
    }
}
