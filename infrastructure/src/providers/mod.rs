//! Inference providers
//!
//! Adapters implementing the
//! [`InferenceGateway`](medpanel_application::InferenceGateway) port.

pub mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleGateway;
