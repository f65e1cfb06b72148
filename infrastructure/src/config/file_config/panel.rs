//! Panel configuration from TOML (`[panel]` and `[timeouts]` sections)

use medpanel_domain::{AgentRole, DEFAULT_ESCALATION_THRESHOLD, PanelMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw panel configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePanelConfig {
    /// Agreement below this escalates (0–100)
    pub escalation_threshold: u8,
    /// First-pass roles to dispatch, by name
    pub roles: Vec<String>,
    pub adversarial_review: bool,
    pub orchestrator_narrative: bool,
    /// Unset: chosen per case from whether an image was supplied
    pub mode: Option<PanelMode>,
}

impl Default for FilePanelConfig {
    fn default() -> Self {
        Self {
            escalation_threshold: DEFAULT_ESCALATION_THRESHOLD,
            roles: AgentRole::FIRST_PASS
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
            adversarial_review: true,
            orchestrator_narrative: false,
            mode: None,
        }
    }
}

impl FilePanelConfig {
    /// Parse role names, returning the roles and the names that did not parse.
    pub fn parse_roles(&self) -> (Vec<AgentRole>, Vec<String>) {
        let mut roles = Vec::new();
        let mut unknown = Vec::new();
        for name in &self.roles {
            match name.parse::<AgentRole>() {
                Ok(role) if !roles.contains(&role) => roles.push(role),
                Ok(_) => {}
                Err(_) => unknown.push(name.clone()),
            }
        }
        (roles, unknown)
    }
}

/// Raw timeout configuration from TOML, in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTimeoutsConfig {
    /// Bound on the whole first pass
    pub case_deadline_seconds: u64,
    /// Slice for each first-pass agent
    pub agent_seconds: u64,
    /// Slice for the adversarial review and the narrative
    pub review_seconds: u64,
}

impl Default for FileTimeoutsConfig {
    fn default() -> Self {
        Self {
            case_deadline_seconds: 120,
            agent_seconds: 90,
            review_seconds: 60,
        }
    }
}

impl FileTimeoutsConfig {
    pub fn case_deadline(&self) -> Duration {
        Duration::from_secs(self.case_deadline_seconds)
    }

    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_seconds)
    }

    pub fn review_deadline(&self) -> Duration {
        Duration::from_secs(self.review_seconds)
    }
}
