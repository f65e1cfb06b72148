//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod evidence;
pub mod inference_gateway;
pub mod progress;
pub mod report_logger;
