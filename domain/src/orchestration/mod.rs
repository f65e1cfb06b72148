//! Panel run lifecycle
//!
//! A run moves through a fixed sequence of stages:
//!
//! ```text
//! Created ─▶ Dispatching ─▶ Reviewing ─▶ Synthesizing ─▶ Scoring ─▶ Finalized
//!                 │                            │
//!                 └──────────▶ Failed ◀────────┘
//! ```

pub mod panel_mode;
pub mod stage;

pub use panel_mode::PanelMode;
pub use stage::{PanelRun, PanelStage};
