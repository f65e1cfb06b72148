//! Combining individual judgments into one governed decision.
//!
//! ```text
//! AgentResult[] ──synthesize──▶ Differential ──score_agreement──▶ AgreementScore
//!                                    │                                 │
//!                                    └──────────┬──────────────────────┘
//!                       CritiqueNote[] ─────────▼
//!                                      EscalationPolicy::decide ──▶ EscalationDecision
//! ```
//!
//! Every function here is pure: identical inputs give identical outputs.

pub mod agreement;
pub mod differential;
pub mod escalation;
pub mod weights;

pub use agreement::{AgreementScore, score_agreement};
pub use differential::{Differential, DifferentialEntry, compose_rationale, synthesize};
pub use escalation::{
    DEFAULT_ESCALATION_THRESHOLD, EscalationDecision, EscalationInput, EscalationPolicy,
    EscalationReason,
};
pub use weights::RoleWeights;
