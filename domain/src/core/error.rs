//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Clinical notes are required")]
    EmptyNotes,

    #[error("Image payload is empty")]
    EmptyImage,

    #[error("Invalid case identifier: {0}")]
    InvalidCaseId(String),

    #[error("No diagnosis labels were produced by the surviving agents")]
    EmptyDifferential,

    #[error("Weight for {role} must be in (0, 1], got {weight}")]
    InvalidWeight { role: String, weight: f64 },

    #[error("Escalation threshold must be at most 100, got {0}")]
    InvalidThreshold(u8),

    #[error("Invalid stage transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
