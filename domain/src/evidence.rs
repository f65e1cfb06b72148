//! Retrieved literature passed to the evidence reviewer

use serde::{Deserialize, Serialize};

/// A passage retrieved for a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSnippet {
    /// Where the passage came from (file name, citation, URL)
    pub source: String,
    pub excerpt: String,
    /// Retriever-specific relevance; higher is better
    pub relevance: f64,
}

impl EvidenceSnippet {
    pub fn new(source: impl Into<String>, excerpt: impl Into<String>, relevance: f64) -> Self {
        Self {
            source: source.into(),
            excerpt: excerpt.into(),
            relevance,
        }
    }
}
