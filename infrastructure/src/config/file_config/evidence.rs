//! Evidence retrieval configuration from TOML (`[evidence]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw evidence configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEvidenceConfig {
    /// Directory of `.md` / `.txt` literature; retrieval is off when unset
    pub directory: Option<PathBuf>,
    /// Snippets handed to the Evidence Reviewer
    pub max_snippets: usize,
    /// Characters kept from each matching document
    pub excerpt_chars: usize,
}

impl Default for FileEvidenceConfig {
    fn default() -> Self {
        Self {
            directory: None,
            max_snippets: 5,
            excerpt_chars: 800,
        }
    }
}
