//! Evidence retrieval adapters

mod local;

pub use local::LocalEvidenceRetriever;
