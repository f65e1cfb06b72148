//! Core domain concepts shared across all subdomains.
//!
//! - [`case::Case`]: the immutable clinical case a panel analyzes
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: label normalization and truncation helpers

pub mod case;
pub mod error;
pub mod string;
