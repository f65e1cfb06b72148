//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod invoke_agent;
pub mod run_panel;

#[cfg(test)]
pub(crate) mod testing;
