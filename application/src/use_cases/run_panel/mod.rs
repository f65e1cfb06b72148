//! RunPanel use case
//!
//! The pipeline controller. It owns one case for the length of a request
//! and walks it through the panel stages:
//!
//! 1. **Dispatching**: first-pass agents run concurrently ([`dispatch`])
//! 2. **Reviewing**: the Devil's Advocate critiques the survivors ([`review`])
//! 3. **Synthesizing**: survivors are merged into a differential; the
//!    Orchestrator optionally narrates it
//! 4. **Scoring**: agreement and the escalation decision
//! 5. **Finalized**: the report is assembled and logged
//!
//! A run that cannot produce a report ends in `Failed` and returns a
//! [`PanelError`]; there is no partial report.

mod dispatch;
mod review;
pub mod types;

pub use types::{FirstPass, PanelError, ReviewOutcome};

use crate::config::PanelConfig;
use crate::ports::evidence::{EvidenceRetriever, NoEvidence};
use crate::ports::inference_gateway::InferenceGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::report_logger::{NoReportLogger, ReportEvent, ReportLogger};
use crate::use_cases::invoke_agent::InvokeAgentUseCase;
use medpanel_domain::{
    AgentResult, Case, EscalationInput, EscalationPolicy, ImagePayload, PanelReport, PanelRun,
    PanelStage, PanelTrace, ReportParts, compose_rationale, score_agreement, synthesize,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for running a diagnostic panel on one case
pub struct RunPanelUseCase<G: InferenceGateway + 'static> {
    invoker: InvokeAgentUseCase<G>,
    config: PanelConfig,
    policy: EscalationPolicy,
    evidence: Arc<dyn EvidenceRetriever>,
    report_logger: Arc<dyn ReportLogger>,
}

impl<G: InferenceGateway + 'static> RunPanelUseCase<G> {
    /// Build a controller for a validated configuration.
    ///
    /// # Errors
    ///
    /// [`PanelError::InvalidConfig`] listing every violation.
    pub fn new(gateway: Arc<G>, config: PanelConfig) -> Result<Self, PanelError> {
        let issues = config.validate();
        if !issues.is_empty() {
            return Err(PanelError::InvalidConfig(
                issues
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }
        let policy = config.escalation_policy()?;

        Ok(Self {
            invoker: InvokeAgentUseCase::new(gateway),
            config,
            policy,
            evidence: Arc::new(NoEvidence),
            report_logger: Arc::new(NoReportLogger),
        })
    }

    pub fn with_evidence(mut self, evidence: Arc<dyn EvidenceRetriever>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn with_report_logger(mut self, logger: Arc<dyn ReportLogger>) -> Self {
        self.report_logger = logger;
        self
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Analyze an optional image plus clinical notes.
    pub async fn analyze(
        &self,
        image: Option<ImagePayload>,
        notes: &str,
    ) -> Result<PanelReport, PanelError> {
        let case = Case::new(image, notes)?;
        self.analyze_case(case).await
    }

    /// Analyze a prepared case without progress reporting
    pub async fn analyze_case(&self, case: Case) -> Result<PanelReport, PanelError> {
        let (report, _) = self.analyze_with_trace(case, &NoProgress).await?;
        Ok(report)
    }

    /// Analyze a case, returning the report and the per-agent trace.
    pub async fn analyze_with_trace(
        &self,
        case: Case,
        progress: &dyn ProgressNotifier,
    ) -> Result<(PanelReport, PanelTrace), PanelError> {
        let case = Arc::new(case);
        let mut run = PanelRun::new(case.id());
        info!("Starting panel for case {}", case.id());

        // Dispatching
        run.advance(PanelStage::Dispatching)?;
        let first_pass = match self.dispatch_first_pass(&case, progress).await {
            Ok(first_pass) => first_pass,
            Err(e) => return Err(self.fail(&mut run, e)),
        };
        let surviving = first_pass.surviving();
        let mut results: Vec<AgentResult> = first_pass.results.clone();

        // Reviewing
        run.advance(PanelStage::Reviewing)?;
        let review = self.adversarial_review(&case, &surviving, progress).await;
        results.push(review.result.clone());

        // Synthesizing
        run.advance(PanelStage::Synthesizing)?;
        progress.on_stage_start(
            PanelStage::Synthesizing,
            usize::from(self.config.orchestrator_narrative),
        );
        let differential = match synthesize(&surviving, &self.config.weights) {
            Ok(differential) => differential,
            Err(e) => return Err(self.fail(&mut run, e.into())),
        };
        debug!(
            "Differential for case {}: {} entries, primary {}",
            case.id(),
            differential.len(),
            differential.primary().label
        );

        let mut rationale = compose_rationale(&surviving);
        let mut notes = Vec::new();
        let narrative = self
            .narrate(&case, &differential, &surviving, &review.critique, progress)
            .await;
        if narrative.is_ok() {
            rationale = narrative.rationale.clone();
        } else if let Some(failure) = &narrative.failure {
            notes.push(format!(
                "orchestrator narrative unavailable ({}): using composed rationale",
                failure
            ));
        }
        results.push(narrative);
        progress.on_stage_complete(PanelStage::Synthesizing);

        // Scoring
        run.advance(PanelStage::Scoring)?;
        let agreement = score_agreement(&surviving, &differential);
        let decision = self.policy.decide(&EscalationInput::new(
            agreement.score,
            &review.critique,
            &differential.primary().label,
            first_pass.dispatched(),
            first_pass.degraded(),
        ));

        // Finalized
        run.advance(PanelStage::Finalized)?;
        let report = PanelReport::assemble(ReportParts {
            case_id: case.id(),
            differential,
            agreement,
            decision,
            critique_notes: review.critique,
            results: &results,
            review: review.status,
            rationale,
            notes,
        });

        info!(
            "Case {}: {} (agreement {}, escalate {})",
            report.case_id(),
            report.primary_diagnosis(),
            report.panel_agreement_score(),
            report.escalate_to_human()
        );
        self.report_logger.log(ReportEvent::new(
            "panel_report",
            serde_json::to_value(&report).unwrap_or_default(),
        ));

        let trace = PanelTrace::new(case.id(), run.history().to_vec(), results);
        Ok((report, trace))
    }

    fn fail(&self, run: &mut PanelRun, error: PanelError) -> PanelError {
        if let Err(e) = run.advance(PanelStage::Failed) {
            warn!("Could not mark run failed: {}", e);
        }
        warn!("Case {} failed: {}", run.case_id(), error);
        self.report_logger.log(ReportEvent::new(
            "panel_failed",
            serde_json::json!({
                "case_id": run.case_id(),
                "kind": error.kind(),
                "error": error.to_string(),
                "stages": run.history(),
            }),
        ));
        error
    }
}
