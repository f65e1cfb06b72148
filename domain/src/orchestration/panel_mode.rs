//! Panel mode: which first-pass roles a case is dispatched to.

use crate::panel::AgentRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a case is routed to the first pass
///
/// - **Full** (default): every enabled role is dispatched. A role that
///   needs an image the case lacks fails with a missing-input condition.
/// - **TextOnly**: image-reading roles are not dispatched at all and are
///   reported as skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelMode {
    #[default]
    Full,
    TextOnly,
}

impl PanelMode {
    /// Whether `role` is dispatched under this mode
    pub fn dispatches(&self, role: AgentRole) -> bool {
        match self {
            PanelMode::Full => true,
            PanelMode::TextOnly => !role.requires_image(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelMode::Full => "full",
            PanelMode::TextOnly => "text-only",
        }
    }
}

impl fmt::Display for PanelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PanelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "full" => Ok(PanelMode::Full),
            "text-only" | "text" => Ok(PanelMode::TextOnly),
            other => Err(format!("Unknown panel mode: {}. Valid: full, text-only", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_rules() {
        assert!(PanelMode::Full.dispatches(AgentRole::Radiologist));
        assert!(!PanelMode::TextOnly.dispatches(AgentRole::Radiologist));
        assert!(PanelMode::TextOnly.dispatches(AgentRole::Internist));
    }

    #[test]
    fn test_parse() {
        assert_eq!("text-only".parse::<PanelMode>().ok(), Some(PanelMode::TextOnly));
        assert_eq!("TEXT_ONLY".parse::<PanelMode>().ok(), Some(PanelMode::TextOnly));
        assert_eq!("full".parse::<PanelMode>().ok(), Some(PanelMode::Full));
        assert!("partial".parse::<PanelMode>().is_err());
    }

    #[test]
    fn test_serde() {
        assert_eq!(
            serde_json::to_string(&PanelMode::TextOnly).unwrap(),
            "\"text-only\""
        );
    }
}
