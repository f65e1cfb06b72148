//! OpenAI-compatible chat completions gateway
//!
//! Works against any endpoint that speaks `POST {base_url}/chat/completions`
//! (OpenAI, vLLM, Ollama, OpenRouter, ...). Images travel inline as base64
//! `data:` URLs in a multimodal user message.

use crate::config::FileInferenceConfig;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use medpanel_application::{GatewayError, InferenceGateway, PromptContext};
use medpanel_domain::core::string::truncate;
use medpanel_domain::{AgentRole, ImagePayload};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gateway to an OpenAI-compatible chat completions endpoint
pub struct OpenAiCompatibleGateway {
    client: Client,
    config: FileInferenceConfig,
    api_key: Option<String>,
}

impl OpenAiCompatibleGateway {
    /// Create a gateway, reading the API key from `config.api_key_env`.
    pub fn new(config: FileInferenceConfig) -> Result<Self, GatewayError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        let client = Client::builder()
            .user_agent(concat!("medpanel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, role: AgentRole, context: &PromptContext) -> ChatRequest {
        let user_content = match &context.image {
            Some(image) => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: context.prompt.clone(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: data_url(image),
                    },
                },
            ]),
            None => MessageContent::Text(context.prompt.clone()),
        };

        ChatRequest {
            model: self.config.model_for(role).to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(context.system_prompt.clone()),
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl InferenceGateway for OpenAiCompatibleGateway {
    async fn run_agent(
        &self,
        role: AgentRole,
        context: &PromptContext,
    ) -> Result<String, GatewayError> {
        let request = self.build_request(role, context);
        debug!("{} -> {} ({})", role, self.endpoint(), request.model);

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(map_send_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GatewayError::RequestFailed(format!(
                "status {}: {}",
                status,
                truncate(body.trim(), 300)
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        completion.into_text()
    }
}

fn map_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

fn data_url(image: &ImagePayload) -> String {
    format!(
        "data:{};base64,{}",
        image.media_type(),
        STANDARD.encode(image.bytes())
    )
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, GatewayError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| GatewayError::InvalidResponse("no message content".to_string()))
    }
}
