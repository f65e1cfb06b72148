//! Inference gateway port
//!
//! Defines the interface for calling the external inference capability that
//! performs each agent's image or text reasoning.

use async_trait::async_trait;
use medpanel_domain::{AgentRole, ImagePayload};
use thiserror::Error;

/// Errors that can occur during inference gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Role not configured: {0}")]
    RoleNotConfigured(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Everything one agent call sends to the inference capability
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub system_prompt: String,
    pub prompt: String,
    /// Only set for roles that read the image
    pub image: Option<ImagePayload>,
}

impl PromptContext {
    pub fn new(system_prompt: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            prompt: prompt.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }
}

/// Gateway to the external inference capability
///
/// One call per agent per case. The response is the raw model output; the
/// application layer parses it. Implementations (adapters) live in the
/// infrastructure layer.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    async fn run_agent(
        &self,
        role: AgentRole,
        context: &PromptContext,
    ) -> Result<String, GatewayError>;
}
