//! Test doubles shared by the use case tests

use crate::ports::evidence::{EvidenceRetriever, RetrievalError};
use crate::ports::inference_gateway::{GatewayError, InferenceGateway, PromptContext};
use crate::ports::progress::ProgressNotifier;
use crate::ports::report_logger::{ReportEvent, ReportLogger};
use async_trait::async_trait;
use medpanel_domain::{AgentResult, AgentRole, Case, EvidenceSnippet, ImagePayload, PanelStage};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// What the gateway does for one role
#[derive(Debug, Clone)]
pub enum Script {
    Reply(String),
    Delayed(Duration, String),
    Fail(String),
    /// Never answers
    Hang,
}

/// Gateway returning canned responses per role and recording every call
#[derive(Default)]
pub struct ScriptedGateway {
    scripts: HashMap<AgentRole, Script>,
    calls: Mutex<Vec<(AgentRole, PromptContext)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, role: AgentRole, script: Script) -> Self {
        self.scripts.insert(role, script);
        self
    }

    pub fn reply(self, role: AgentRole, text: &str) -> Self {
        self.script(role, Script::Reply(text.to_string()))
    }

    pub fn fail(self, role: AgentRole, message: &str) -> Self {
        self.script(role, Script::Fail(message.to_string()))
    }

    pub fn calls(&self) -> Vec<AgentRole> {
        let mut roles: Vec<AgentRole> = self.calls.lock().unwrap().iter().map(|(r, _)| *r).collect();
        roles.sort();
        roles
    }

    pub fn prompt_for(&self, role: AgentRole) -> String {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, c)| c.prompt.clone())
            .unwrap_or_default()
    }

    pub fn saw_image(&self, role: AgentRole) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|(r, c)| *r == role && c.image.is_some())
    }
}

#[async_trait]
impl InferenceGateway for ScriptedGateway {
    async fn run_agent(
        &self,
        role: AgentRole,
        context: &PromptContext,
    ) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push((role, context.clone()));
        match self.scripts.get(&role).cloned() {
            Some(Script::Reply(text)) => Ok(text),
            Some(Script::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Some(Script::Fail(message)) => Err(GatewayError::RequestFailed(message)),
            Some(Script::Hang) => std::future::pending().await,
            None => Err(GatewayError::RoleNotConfigured(role.to_string())),
        }
    }
}

/// Logger that keeps every event
#[derive(Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<(&'static str, serde_json::Value)>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn payloads(&self, event_type: &str) -> Vec<serde_json::Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == event_type)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl ReportLogger for RecordingLogger {
    fn log(&self, event: ReportEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type, event.payload));
    }
}

/// Progress notifier that records callbacks as strings
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressNotifier for RecordingProgress {
    fn on_stage_start(&self, stage: PanelStage, total_agents: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {} {}", stage.as_str(), total_agents));
    }

    fn on_agent_complete(&self, stage: PanelStage, result: &AgentResult) {
        self.events.lock().unwrap().push(format!(
            "agent {} {} {}",
            stage.as_str(),
            result.role.as_str(),
            result.status
        ));
    }

    fn on_stage_complete(&self, stage: PanelStage) {
        self.events
            .lock()
            .unwrap()
            .push(format!("done {}", stage.as_str()));
    }
}

/// Retriever returning a fixed set of snippets
pub struct FixedEvidence(pub Vec<EvidenceSnippet>);

#[async_trait]
impl EvidenceRetriever for FixedEvidence {
    async fn retrieve(
        &self,
        _notes: &str,
        limit: usize,
    ) -> Result<Vec<EvidenceSnippet>, RetrievalError> {
        Ok(self.0.iter().take(limit).cloned().collect())
    }
}

/// Retriever that always errors
pub struct BrokenEvidence;

#[async_trait]
impl EvidenceRetriever for BrokenEvidence {
    async fn retrieve(
        &self,
        _notes: &str,
        _limit: usize,
    ) -> Result<Vec<EvidenceSnippet>, RetrievalError> {
        Err(RetrievalError::Unavailable("index offline".to_string()))
    }
}

/// Retriever that takes the given time before finding nothing
pub struct SlowEvidence(pub Duration);

#[async_trait]
impl EvidenceRetriever for SlowEvidence {
    async fn retrieve(
        &self,
        _notes: &str,
        _limit: usize,
    ) -> Result<Vec<EvidenceSnippet>, RetrievalError> {
        tokio::time::sleep(self.0).await;
        Ok(Vec::new())
    }
}

pub fn text_case(notes: &str) -> Case {
    Case::new(None, notes).unwrap()
}

pub fn case_with_image(notes: &str) -> Case {
    let image = ImagePayload::new(vec![0x89, b'P', b'N', b'G', 1, 2, 3], "image/png").unwrap();
    Case::new(Some(image), notes).unwrap()
}

/// A first-pass reply naming the given diagnoses
pub fn opinion(diagnoses: &[(&str, f64)], rationale: &str) -> String {
    serde_json::json!({
        "diagnoses": diagnoses
            .iter()
            .map(|(label, confidence)| serde_json::json!({"label": label, "confidence": confidence}))
            .collect::<Vec<_>>(),
        "rationale": rationale,
    })
    .to_string()
}
