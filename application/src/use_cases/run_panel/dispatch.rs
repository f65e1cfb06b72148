//! Dispatch coordinator: the concurrent first pass.

use super::RunPanelUseCase;
use super::types::{FirstPass, PanelError};
use crate::ports::evidence::EvidenceRetriever;
use crate::ports::inference_gateway::InferenceGateway;
use crate::ports::progress::ProgressNotifier;
use crate::ports::report_logger::ReportEvent;
use crate::use_cases::invoke_agent::AgentInput;
use medpanel_domain::{AgentFailure, AgentResult, AgentRole, Case, EvidenceSnippet, PanelStage};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

impl<G: InferenceGateway + 'static> RunPanelUseCase<G> {
    /// Run every dispatched first-pass role concurrently against the case deadline.
    ///
    /// Each agent gets `min(agent_timeout, time left before the deadline)`.
    /// The Evidence Reviewer spends part of that budget on its literature
    /// lookup. When the deadline passes, in-flight agents are cancelled and
    /// recorded as timed out; the coordinator does not wait for them to
    /// acknowledge.
    ///
    /// # Errors
    ///
    /// [`PanelError::PanelUnavailable`] when no first-pass agent returned `Ok`.
    pub(super) async fn dispatch_first_pass(
        &self,
        case: &Arc<Case>,
        progress: &dyn ProgressNotifier,
    ) -> Result<FirstPass, PanelError> {
        let config = &self.config;
        let deadline = Instant::now() + config.case_deadline;
        let cancel = CancellationToken::new();

        let mut results: Vec<AgentResult> = Vec::new();
        let mut pending: BTreeSet<AgentRole> = BTreeSet::new();
        let mut join_set = JoinSet::new();

        for role in AgentRole::FIRST_PASS {
            if !config.dispatches(role) {
                debug!("{} not dispatched for case {}", role, case.id());
                results.push(AgentResult::skipped(role));
                continue;
            }
            pending.insert(role);
        }

        info!(
            "Dispatching case {} to {} first-pass agents",
            case.id(),
            pending.len()
        );
        progress.on_stage_start(PanelStage::Dispatching, pending.len());

        for role in pending.iter().copied() {
            let invoker = self.invoker.clone();
            let case = Arc::clone(case);
            let cancel = cancel.clone();
            let budget = config
                .agent_timeout
                .min(deadline.saturating_duration_since(Instant::now()));
            let retriever =
                (role == AgentRole::EvidenceReviewer).then(|| Arc::clone(&self.evidence));
            let limit = config.evidence_limit;

            join_set.spawn(async move {
                let started = Instant::now();
                let lookup = match retriever {
                    Some(retriever) => {
                        gather_evidence(retriever.as_ref(), case.notes(), limit, budget, &cancel)
                            .await
                    }
                    None => Ok(Vec::new()),
                };
                let evidence = match lookup {
                    Ok(snippets) => snippets,
                    Err(failure) => {
                        warn!("{} gave up before inference: {}", role, failure);
                        return AgentResult::failed(role, failure, started.elapsed());
                    }
                };

                invoker
                    .execute(
                        role,
                        &case,
                        AgentInput::FirstPass {
                            evidence: &evidence,
                        },
                        budget.saturating_sub(started.elapsed()),
                        &cancel,
                    )
                    .await
            });
        }

        let mut deadline_hit = false;
        loop {
            let next = tokio::select! {
                biased;
                next = join_set.join_next() => next,
                _ = tokio::time::sleep_until(deadline) => {
                    warn!("Case deadline elapsed with {} agents in flight", pending.len());
                    cancel.cancel();
                    join_set.abort_all();
                    deadline_hit = true;
                    break;
                }
            };

            let Some(joined) = next else {
                break;
            };

            match joined {
                Ok(result) => {
                    info!("{} finished: {}", result.role, result.status);
                    pending.remove(&result.role);
                    self.record_agent(PanelStage::Dispatching, &result, progress);
                    results.push(result);
                }
                Err(e) => {
                    warn!("Agent task join error: {}", e);
                }
            }
        }

        // Roles with no result: cut off by the deadline, or their task died
        for role in pending {
            let failure = if deadline_hit {
                AgentFailure::Cancelled
            } else {
                AgentFailure::Gateway("agent task aborted".to_string())
            };
            let result = AgentResult::failed(role, failure, config.case_deadline);
            self.record_agent(PanelStage::Dispatching, &result, progress);
            results.push(result);
        }

        results.sort_by_key(|r| r.role);
        progress.on_stage_complete(PanelStage::Dispatching);

        let first_pass = FirstPass { results };
        if first_pass.results.iter().all(|r| !r.is_ok()) {
            let summary = first_pass
                .results
                .iter()
                .map(|r| format!("{} {}", r.role.as_str(), r.status))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(PanelError::PanelUnavailable(summary));
        }

        Ok(first_pass)
    }

    pub(super) fn record_agent(
        &self,
        stage: PanelStage,
        result: &AgentResult,
        progress: &dyn ProgressNotifier,
    ) {
        progress.on_agent_complete(stage, result);
        self.report_logger.log(ReportEvent::new(
            "agent_result",
            serde_json::to_value(result).unwrap_or_default(),
        ));
    }
}

/// Literature for the Evidence Reviewer, inside the reviewer's own budget.
///
/// A failed lookup degrades to no evidence; running out of budget or being
/// cancelled ends the agent.
async fn gather_evidence(
    retriever: &dyn EvidenceRetriever,
    notes: &str,
    limit: usize,
    budget: Duration,
    cancel: &CancellationToken,
) -> Result<Vec<EvidenceSnippet>, AgentFailure> {
    let lookup = tokio::time::timeout(budget, retriever.retrieve(notes, limit));
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AgentFailure::Cancelled),
        outcome = lookup => match outcome {
            Ok(Ok(snippets)) => {
                debug!("Retrieved {} evidence snippets", snippets.len());
                Ok(snippets)
            }
            Ok(Err(e)) => {
                warn!("Evidence retrieval failed: {}", e);
                Ok(Vec::new())
            }
            Err(_) => Err(AgentFailure::TimedOut {
                after_ms: budget.as_millis() as u64,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PanelConfig;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::run_panel::{PanelError, RunPanelUseCase};
    use crate::use_cases::testing::{
        Script, ScriptedGateway, SlowEvidence, case_with_image, opinion, text_case,
    };
    use medpanel_domain::{AgentFailure, AgentRole, AgentStatus, PanelMode};
    use std::sync::Arc;
    use std::time::Duration;

    fn panel(gateway: ScriptedGateway, config: PanelConfig) -> RunPanelUseCase<ScriptedGateway> {
        RunPanelUseCase::new(Arc::new(gateway), config).unwrap()
    }

    fn all_reply() -> ScriptedGateway {
        ScriptedGateway::new()
            .reply(AgentRole::Radiologist, &opinion(&[("pneumonia", 0.8)], "opacity"))
            .reply(AgentRole::Internist, &opinion(&[("pneumonia", 0.6)], "fever"))
            .reply(AgentRole::EvidenceReviewer, &opinion(&[("pneumonia", 0.7)], "CURB-65"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_agents_ok() {
        let panel = panel(all_reply(), PanelConfig::default());
        let first_pass = panel
            .dispatch_first_pass(&Arc::new(case_with_image("cough")), &NoProgress)
            .await
            .unwrap();

        assert_eq!(first_pass.results.len(), 3);
        assert!(first_pass.results.iter().all(|r| r.is_ok()));
        assert_eq!(first_pass.dispatched(), 3);
        assert_eq!(first_pass.degraded(), 0);
        let roles: Vec<_> = first_pass.results.iter().map(|r| r.role).collect();
        assert_eq!(roles, AgentRole::FIRST_PASS.to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_agent_times_out_and_siblings_survive() {
        let gateway = all_reply().script(
            AgentRole::Internist,
            Script::Delayed(Duration::from_secs(100), opinion(&[("bronchitis", 0.9)], "")),
        );
        let panel = panel(gateway, PanelConfig::default());
        let first_pass = panel
            .dispatch_first_pass(&Arc::new(case_with_image("cough")), &NoProgress)
            .await
            .unwrap();

        let internist = first_pass.result_for(AgentRole::Internist).unwrap();
        assert_eq!(internist.status, AgentStatus::TimedOut);
        assert_eq!(internist.failure, Some(AgentFailure::TimedOut { after_ms: 90_000 }));
        assert!(internist.diagnoses.is_empty());
        assert!(first_pass.result_for(AgentRole::Radiologist).unwrap().is_ok());
        assert_eq!(first_pass.degraded(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_case_deadline_bounds_wall_time() {
        let gateway = all_reply()
            .script(AgentRole::Radiologist, Script::Hang)
            .script(AgentRole::EvidenceReviewer, Script::Hang);
        let config = PanelConfig::default()
            .with_case_deadline(Duration::from_secs(30))
            .with_agent_timeout(Duration::from_secs(90));
        let panel = panel(gateway, config);

        let started = tokio::time::Instant::now();
        let first_pass = panel
            .dispatch_first_pass(&Arc::new(case_with_image("cough")), &NoProgress)
            .await
            .unwrap();

        assert!(started.elapsed() <= Duration::from_secs(31));
        for role in [AgentRole::Radiologist, AgentRole::EvidenceReviewer] {
            assert_eq!(first_pass.result_for(role).unwrap().status, AgentStatus::TimedOut);
        }
        assert!(first_pass.result_for(AgentRole::Internist).unwrap().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_retrieval_only_delays_the_evidence_reviewer() {
        let config = PanelConfig::default().with_agent_timeout(Duration::from_secs(20));
        let panel = panel(all_reply(), config)
            .with_evidence(Arc::new(SlowEvidence(Duration::from_secs(80))));

        let started = tokio::time::Instant::now();
        let first_pass = panel
            .dispatch_first_pass(&Arc::new(case_with_image("cough")), &NoProgress)
            .await
            .unwrap();

        assert!(started.elapsed() <= Duration::from_secs(20));
        let reviewer = first_pass.result_for(AgentRole::EvidenceReviewer).unwrap();
        assert_eq!(reviewer.failure, Some(AgentFailure::TimedOut { after_ms: 20_000 }));
        assert!(first_pass.result_for(AgentRole::Radiologist).unwrap().is_ok());
        assert!(first_pass.result_for(AgentRole::Internist).unwrap().is_ok());
        assert_eq!(first_pass.degraded(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_surviving_agents_is_panel_unavailable() {
        let gateway = ScriptedGateway::new()
            .fail(AgentRole::Radiologist, "500")
            .fail(AgentRole::Internist, "500")
            .script(AgentRole::EvidenceReviewer, Script::Hang);
        let panel = panel(gateway, PanelConfig::default());

        let err = panel
            .dispatch_first_pass(&Arc::new(case_with_image("cough")), &NoProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, PanelError::PanelUnavailable(ref m) if m.contains("evidence_reviewer timed_out")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_only_skips_image_roles() {
        let gateway = all_reply();
        let config = PanelConfig::default().with_mode(PanelMode::TextOnly);
        let panel = panel(gateway, config);
        let first_pass = panel
            .dispatch_first_pass(&Arc::new(text_case("cough")), &NoProgress)
            .await
            .unwrap();

        let radiologist = first_pass.result_for(AgentRole::Radiologist).unwrap();
        assert_eq!(radiologist.status, AgentStatus::Skipped);
        assert_eq!(first_pass.dispatched(), 2);
        assert_eq!(first_pass.degraded(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_mode_without_image_is_missing_input() {
        let panel = panel(all_reply(), PanelConfig::default());
        let first_pass = panel
            .dispatch_first_pass(&Arc::new(text_case("cough")), &NoProgress)
            .await
            .unwrap();

        let radiologist = first_pass.result_for(AgentRole::Radiologist).unwrap();
        assert_eq!(radiologist.status, AgentStatus::Failed);
        assert_eq!(
            radiologist.failure,
            Some(AgentFailure::MissingInput("image".to_string()))
        );
        assert_eq!(first_pass.dispatched(), 3);
        assert_eq!(first_pass.degraded(), 1);
    }
}
