//! Prompt domain
//!
//! Templates for every panel role: first-pass opinions, the adversarial
//! critique and the orchestrator's narrative.

mod panel;

pub use panel::PanelPromptTemplate;
