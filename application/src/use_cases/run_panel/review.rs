//! Sequential stages after the first pass: adversarial review and the
//! orchestrator's narrative.

use super::RunPanelUseCase;
use super::types::ReviewOutcome;
use crate::ports::inference_gateway::InferenceGateway;
use crate::ports::progress::ProgressNotifier;
use crate::ports::report_logger::ReportEvent;
use crate::use_cases::invoke_agent::AgentInput;
use medpanel_domain::{
    AgentResult, AgentRole, Case, CritiqueNote, Differential, PanelStage, ReviewStatus,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

impl<G: InferenceGateway + 'static> RunPanelUseCase<G> {
    /// Ask the Devil's Advocate to critique the surviving first-pass results.
    ///
    /// Advisory: a failure or timeout yields an empty critique and
    /// [`ReviewStatus::Unavailable`], never an error.
    pub(super) async fn adversarial_review(
        &self,
        case: &Case,
        surviving: &[AgentResult],
        progress: &dyn ProgressNotifier,
    ) -> ReviewOutcome {
        if !self.config.adversarial_review {
            info!("Adversarial review disabled");
            return ReviewOutcome {
                result: AgentResult::skipped(AgentRole::DevilsAdvocate),
                critique: Vec::new(),
                status: ReviewStatus::Skipped,
            };
        }

        progress.on_stage_start(PanelStage::Reviewing, 1);

        let result = self
            .invoker
            .execute(
                AgentRole::DevilsAdvocate,
                case,
                AgentInput::Adversarial {
                    first_pass: surviving,
                },
                self.config.review_deadline,
                &CancellationToken::new(),
            )
            .await;
        self.record_agent(PanelStage::Reviewing, &result, progress);
        progress.on_stage_complete(PanelStage::Reviewing);

        if !result.is_ok() {
            warn!("Adversarial review unavailable: {}", result.status);
            return ReviewOutcome {
                result,
                critique: Vec::new(),
                status: ReviewStatus::Unavailable,
            };
        }

        let critique = result.critique.clone();
        info!("Adversarial review raised {} concerns", critique.len());
        self.report_logger.log(ReportEvent::new(
            "critique",
            serde_json::json!({
                "case_id": case.id(),
                "concerns": critique,
                "rationale": result.rationale,
            }),
        ));

        ReviewOutcome {
            result,
            critique,
            status: ReviewStatus::Completed,
        }
    }

    /// Have the Orchestrator narrate the synthesized ranking.
    ///
    /// Returns the Orchestrator's result; the caller keeps the composed
    /// rationale unless it is `Ok`.
    pub(super) async fn narrate(
        &self,
        case: &Case,
        differential: &Differential,
        surviving: &[AgentResult],
        critique: &[CritiqueNote],
        progress: &dyn ProgressNotifier,
    ) -> AgentResult {
        if !self.config.orchestrator_narrative {
            return AgentResult::skipped(AgentRole::Orchestrator);
        }

        let result = self
            .invoker
            .execute(
                AgentRole::Orchestrator,
                case,
                AgentInput::Narrative {
                    differential,
                    first_pass: surviving,
                    critique,
                },
                self.config.review_deadline,
                &CancellationToken::new(),
            )
            .await;
        self.record_agent(PanelStage::Synthesizing, &result, progress);
        result
    }
}
