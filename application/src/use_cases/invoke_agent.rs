//! Agent adapter
//!
//! One uniform invocation contract for every panel role. The adapter picks
//! the slice of the case the role may see, builds the prompt, performs
//! exactly one gateway call under a time budget, and normalizes every
//! outcome into an [`AgentResult`]. It never returns an error.

use crate::ports::inference_gateway::{InferenceGateway, PromptContext};
use medpanel_domain::{
    AgentFailure, AgentPass, AgentResult, AgentRole, Case, CritiqueNote, Differential,
    EvidenceSnippet, PanelPromptTemplate, parse_critique, parse_opinion,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Role-specific context beyond the case itself
#[derive(Debug, Clone, Copy)]
pub enum AgentInput<'a> {
    /// Independent opinion; evidence is only read by the Evidence Reviewer
    FirstPass { evidence: &'a [EvidenceSnippet] },
    /// Critique of the surviving first-pass results
    Adversarial { first_pass: &'a [AgentResult] },
    /// Narrative over the synthesized ranking
    Narrative {
        differential: &'a Differential,
        first_pass: &'a [AgentResult],
        critique: &'a [CritiqueNote],
    },
}

/// Use case for invoking one agent
pub struct InvokeAgentUseCase<G: InferenceGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: InferenceGateway + 'static> Clone for InvokeAgentUseCase<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G: InferenceGateway + 'static> InvokeAgentUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Invoke `role` on `case` within `budget`, stopping early if `cancel` fires.
    pub async fn execute(
        &self,
        role: AgentRole,
        case: &Case,
        input: AgentInput<'_>,
        budget: Duration,
        cancel: &CancellationToken,
    ) -> AgentResult {
        let started = Instant::now();

        if role.requires_image() && !case.has_image() {
            debug!("{} needs an image; case {} has none", role, case.id());
            return AgentResult::failed(
                role,
                AgentFailure::MissingInput("image".to_string()),
                Duration::ZERO,
            );
        }
        if cancel.is_cancelled() {
            return AgentResult::failed(role, AgentFailure::Cancelled, Duration::ZERO);
        }

        let context = build_context(role, case, input);
        let call = self.gateway.run_agent(role, &context);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AgentFailure::Cancelled),
            response = tokio::time::timeout(budget, call) => match response {
                Ok(Ok(text)) => Ok(text),
                Ok(Err(e)) => Err(AgentFailure::Gateway(e.to_string())),
                Err(_) => Err(AgentFailure::TimedOut {
                    after_ms: budget.as_millis() as u64,
                }),
            },
        };
        let elapsed = started.elapsed();

        match outcome {
            Ok(text) => interpret(role, &text, elapsed),
            Err(failure) => {
                warn!("{} did not answer: {}", role, failure);
                AgentResult::failed(role, failure, elapsed)
            }
        }
    }
}

fn build_context(role: AgentRole, case: &Case, input: AgentInput<'_>) -> PromptContext {
    let notes = case.notes();
    let prompt = match input {
        AgentInput::FirstPass { evidence } => PanelPromptTemplate::first_pass(role, notes, evidence),
        AgentInput::Adversarial { first_pass } => {
            PanelPromptTemplate::adversarial(notes, first_pass)
        }
        AgentInput::Narrative {
            differential,
            first_pass,
            critique,
        } => PanelPromptTemplate::narrative(notes, differential, first_pass, critique),
    };

    let context = PromptContext::new(PanelPromptTemplate::system(role), prompt);
    match case.image() {
        Some(image) if role.sees_image() => context.with_image(image.clone()),
        _ => context,
    }
}

/// Turn raw output into a result according to the role's pass.
fn interpret(role: AgentRole, text: &str, elapsed: Duration) -> AgentResult {
    let malformed = |detail: String| {
        warn!("{} returned an unusable response: {}", role, detail);
        AgentResult::failed(role, AgentFailure::MalformedResponse(detail), elapsed)
    };

    match role.pass() {
        AgentPass::FirstPass => match parse_opinion(text) {
            Ok(opinion) => AgentResult::ok(role, opinion.diagnoses, opinion.rationale, elapsed),
            Err(e) => malformed(e.to_string()),
        },
        AgentPass::Adversarial => match parse_critique(text) {
            Ok(critique) => AgentResult::ok(role, Vec::new(), critique.rationale, elapsed)
                .with_critique(critique.concerns),
            Err(e) => malformed(e.to_string()),
        },
        AgentPass::Narrative => {
            let narrative = text.trim();
            if narrative.is_empty() {
                malformed("empty narrative".to_string())
            } else {
                AgentResult::ok(role, Vec::new(), narrative, elapsed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{Script, ScriptedGateway, case_with_image, text_case};
    use medpanel_domain::{AgentStatus, RoleWeights, Severity, synthesize};

    fn invoker(gateway: ScriptedGateway) -> (InvokeAgentUseCase<ScriptedGateway>, Arc<ScriptedGateway>) {
        let gateway = Arc::new(gateway);
        (InvokeAgentUseCase::new(Arc::clone(&gateway)), gateway)
    }

    const NO_EVIDENCE: AgentInput<'static> = AgentInput::FirstPass { evidence: &[] };

    #[tokio::test]
    async fn test_first_pass_ok() {
        let (invoker, gateway) = invoker(ScriptedGateway::new().reply(
            AgentRole::Internist,
            r#"{"diagnoses": [{"label": "Bronchitis", "confidence": 0.6}], "rationale": "cough"}"#,
        ));
        let result = invoker
            .execute(
                AgentRole::Internist,
                &text_case("cough, fever"),
                NO_EVIDENCE,
                Duration::from_secs(5),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(result.status, AgentStatus::Ok);
        assert_eq!(result.diagnoses[0].label, "Bronchitis");
        assert_eq!(result.rationale, "cough");
        assert_eq!(gateway.calls(), vec![AgentRole::Internist]);
        // text roles never receive the image
        assert!(!gateway.saw_image(AgentRole::Internist));
    }

    #[tokio::test]
    async fn test_missing_image_fails_without_calling_gateway() {
        let (invoker, gateway) = invoker(ScriptedGateway::new());
        let result = invoker
            .execute(
                AgentRole::Radiologist,
                &text_case("cough"),
                NO_EVIDENCE,
                Duration::from_secs(5),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(result.status, AgentStatus::Failed);
        assert_eq!(
            result.failure,
            Some(AgentFailure::MissingInput("image".to_string()))
        );
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_radiologist_receives_image() {
        let (invoker, gateway) = invoker(ScriptedGateway::new().reply(
            AgentRole::Radiologist,
            r#"{"diagnoses": [{"label": "pneumonia", "confidence": 0.8}]}"#,
        ));
        let result = invoker
            .execute(
                AgentRole::Radiologist,
                &case_with_image("cough"),
                NO_EVIDENCE,
                Duration::from_secs(5),
                &CancellationToken::new(),
            )
            .await;
        assert!(result.is_ok());
        assert!(gateway.saw_image(AgentRole::Radiologist));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_timed_out() {
        let (invoker, _) = invoker(ScriptedGateway::new().script(
            AgentRole::Internist,
            Script::Delayed(Duration::from_secs(30), "{}".to_string()),
        ));
        let result = invoker
            .execute(
                AgentRole::Internist,
                &text_case("cough"),
                NO_EVIDENCE,
                Duration::from_secs(10),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(result.status, AgentStatus::TimedOut);
        assert_eq!(result.failure, Some(AgentFailure::TimedOut { after_ms: 10_000 }));
        assert_eq!(result.elapsed(), Duration::from_secs(10));
        assert!(result.diagnoses.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_the_call() {
        let (invoker, _) = invoker(ScriptedGateway::new().script(AgentRole::Internist, Script::Hang));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            trigger.cancel();
        });

        let result = invoker
            .execute(
                AgentRole::Internist,
                &text_case("cough"),
                NO_EVIDENCE,
                Duration::from_secs(60),
                &cancel,
            )
            .await;
        assert_eq!(result.failure, Some(AgentFailure::Cancelled));
        assert_eq!(result.status, AgentStatus::TimedOut);
    }

    #[tokio::test]
    async fn test_gateway_error_and_malformed_response() {
        let (invoker, _) = invoker(
            ScriptedGateway::new()
                .fail(AgentRole::Internist, "503 Service Unavailable")
                .reply(AgentRole::EvidenceReviewer, "I think it is pneumonia."),
        );
        let case = text_case("cough");
        let cancel = CancellationToken::new();

        let failed = invoker
            .execute(AgentRole::Internist, &case, NO_EVIDENCE, Duration::from_secs(5), &cancel)
            .await;
        assert_eq!(failed.status, AgentStatus::Failed);
        assert!(matches!(failed.failure, Some(AgentFailure::Gateway(ref m)) if m.contains("503")));

        let malformed = invoker
            .execute(
                AgentRole::EvidenceReviewer,
                &case,
                NO_EVIDENCE,
                Duration::from_secs(5),
                &cancel,
            )
            .await;
        assert_eq!(malformed.status, AgentStatus::Failed);
        assert!(matches!(
            malformed.failure,
            Some(AgentFailure::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_adversarial_and_narrative_passes() {
        let first_pass = vec![AgentResult::ok(
            AgentRole::Internist,
            vec![medpanel_domain::RankedDiagnosis::new("asthma", 0.7)],
            "wheeze",
            Duration::ZERO,
        )];
        let differential = synthesize(&first_pass, &RoleWeights::default()).unwrap();
        let (invoker, gateway) = invoker(
            ScriptedGateway::new()
                .reply(
                    AgentRole::DevilsAdvocate,
                    r#"{"concerns": [{"concern": "No spirometry", "severity": "warning", "referenced_labels": ["asthma"]}], "rationale": "plausible"}"#,
                )
                .reply(AgentRole::Orchestrator, "  Asthma is the leading explanation.  "),
        );
        let case = text_case("wheeze");
        let cancel = CancellationToken::new();

        let review = invoker
            .execute(
                AgentRole::DevilsAdvocate,
                &case,
                AgentInput::Adversarial {
                    first_pass: &first_pass,
                },
                Duration::from_secs(5),
                &cancel,
            )
            .await;
        assert!(review.is_ok());
        assert!(review.diagnoses.is_empty());
        assert_eq!(review.critique.len(), 1);
        assert_eq!(review.critique[0].severity, Severity::Warning);
        assert!(gateway.prompt_for(AgentRole::DevilsAdvocate).contains("asthma (0.70)"));

        let narrative = invoker
            .execute(
                AgentRole::Orchestrator,
                &case,
                AgentInput::Narrative {
                    differential: &differential,
                    first_pass: &first_pass,
                    critique: &review.critique,
                },
                Duration::from_secs(5),
                &cancel,
            )
            .await;
        assert_eq!(narrative.rationale, "Asthma is the leading explanation.");
    }
}
