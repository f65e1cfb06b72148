//! Evidence retrieval port
//!
//! Literature lookup consumed only when building the Evidence Reviewer's
//! prompt. The retriever is an opaque input provider; its indexing is not
//! this crate's concern.

use async_trait::async_trait;
use medpanel_domain::EvidenceSnippet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("Evidence source unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(String),
}

#[async_trait]
pub trait EvidenceRetriever: Send + Sync {
    /// Up to `limit` snippets relevant to the notes, most relevant first
    async fn retrieve(
        &self,
        notes: &str,
        limit: usize,
    ) -> Result<Vec<EvidenceSnippet>, RetrievalError>;
}

/// Retriever that never finds anything
pub struct NoEvidence;

#[async_trait]
impl EvidenceRetriever for NoEvidence {
    async fn retrieve(
        &self,
        _notes: &str,
        _limit: usize,
    ) -> Result<Vec<EvidenceSnippet>, RetrievalError> {
        Ok(Vec::new())
    }
}
