//! Application-level configuration.
//!
//! - [`PanelConfig`]: thresholds, weights, roles and deadlines injected into
//!   the pipeline controller

pub mod panel_config;

pub use panel_config::{ConfigIssue, PanelConfig};
