//! Critique notes raised by the adversarial review

use crate::core::string::normalize_label;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a flagged concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" | "low" => Ok(Severity::Info),
            "warning" | "warn" | "medium" => Ok(Severity::Warning),
            "critical" | "high" => Ok(Severity::Critical),
            other => Err(format!("Unknown severity: {}", other)),
        }
    }
}

/// A concern flagged by the Devil's Advocate
///
/// Referenced labels are stored normalized so they compare directly
/// against differential labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritiqueNote {
    pub concern: String,
    pub severity: Severity,
    pub referenced_labels: Vec<String>,
}

impl CritiqueNote {
    pub fn new(
        concern: impl Into<String>,
        severity: Severity,
        referenced_labels: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        let mut labels: Vec<String> = Vec::new();
        for label in referenced_labels {
            let label = normalize_label(label.as_ref());
            if !label.is_empty() && !labels.contains(&label) {
                labels.push(label);
            }
        }
        Self {
            concern: concern.into(),
            severity,
            referenced_labels: labels,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    /// Whether this note names the given diagnosis (compared normalized)
    pub fn references(&self, label: &str) -> bool {
        let label = normalize_label(label);
        self.referenced_labels.iter().any(|l| *l == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_normalized_and_deduplicated() {
        let note = CritiqueNote::new(
            "Consider TB",
            Severity::Warning,
            ["Pneumonia ", "pneumonia", "  ", "Tuberculosis"],
        );
        assert_eq!(note.referenced_labels, vec!["pneumonia", "tuberculosis"]);
        assert!(note.references("PNEUMONIA"));
        assert!(!note.references("bronchitis"));
    }

    #[test]
    fn test_severity_parse_and_order() {
        assert_eq!("Critical".parse::<Severity>().ok(), Some(Severity::Critical));
        assert_eq!("warn".parse::<Severity>().ok(), Some(Severity::Warning));
        assert!("urgent".parse::<Severity>().is_err());
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_is_critical() {
        let none: [&str; 0] = [];
        assert!(CritiqueNote::new("x", Severity::Critical, none).is_critical());
        assert!(!CritiqueNote::new("x", Severity::Info, none).is_critical());
    }
}
