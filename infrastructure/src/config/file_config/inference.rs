//! Inference endpoint configuration from TOML (`[inference]` section)

use medpanel_domain::AgentRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw inference configuration from TOML
///
/// Any OpenAI-compatible chat completions endpoint works. Per-role models
/// are keyed by role name (`radiologist`, `devils_advocate`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInferenceConfig {
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Default model for every role
    pub model: String,
    pub role_models: BTreeMap<String, String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for FileInferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o".to_string(),
            role_models: BTreeMap::new(),
            temperature: 0.0,
            max_tokens: 1024,
        }
    }
}

impl FileInferenceConfig {
    /// Model for `role`, falling back to the default model
    pub fn model_for(&self, role: AgentRole) -> &str {
        self.role_models
            .iter()
            .find(|(name, _)| name.parse::<AgentRole>().ok() == Some(role))
            .map(|(_, model)| model.as_str())
            .unwrap_or(&self.model)
    }
}
