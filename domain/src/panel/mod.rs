//! Panel members and what they produce.
//!
//! - [`role::AgentRole`]: the closed set of specialist personas
//! - [`result::AgentResult`]: one invocation's outcome, success or not
//! - [`critique::CritiqueNote`]: concerns raised by the adversarial pass
//! - [`parsing`]: turning raw inference output into the above

pub mod critique;
pub mod parsing;
pub mod result;
pub mod role;

pub use critique::{CritiqueNote, Severity};
pub use parsing::{ParseError, ParsedCritique, ParsedOpinion, parse_critique, parse_opinion};
pub use result::{AgentFailure, AgentResult, AgentStatus, RankedDiagnosis};
pub use role::{AgentPass, AgentRole};
