//! Per-run detail that is kept out of the deterministic report

use crate::orchestration::stage::PanelStage;
use crate::panel::{AgentResult, AgentRole};
use serde::{Deserialize, Serialize};

/// What happened during a panel run
///
/// Carries elapsed times and raw failure detail, which vary between runs
/// and therefore do not belong in [`PanelReport`](super::PanelReport).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelTrace {
    pub case_id: String,
    /// Stages visited, in order
    pub stages: Vec<PanelStage>,
    /// One entry per role that has a result, in canonical role order
    pub agent_results: Vec<AgentResult>,
}

impl PanelTrace {
    pub fn new(
        case_id: impl Into<String>,
        stages: Vec<PanelStage>,
        mut agent_results: Vec<AgentResult>,
    ) -> Self {
        agent_results.sort_by_key(|r| r.role);
        Self {
            case_id: case_id.into(),
            stages,
            agent_results,
        }
    }

    pub fn result_for(&self, role: AgentRole) -> Option<&AgentResult> {
        self.agent_results.iter().find(|r| r.role == role)
    }

    /// Wall time of the slowest first-pass agent
    pub fn first_pass_elapsed_ms(&self) -> u64 {
        self.agent_results
            .iter()
            .filter(|r| r.role.is_first_pass())
            .map(|r| r.elapsed_ms)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::AgentFailure;
    use std::time::Duration;

    #[test]
    fn test_trace_orders_results_by_role() {
        let trace = PanelTrace::new(
            "case-1",
            vec![PanelStage::Created, PanelStage::Dispatching],
            vec![
                AgentResult::ok(AgentRole::Internist, vec![], "", Duration::from_millis(30)),
                AgentResult::failed(
                    AgentRole::Radiologist,
                    AgentFailure::TimedOut { after_ms: 80 },
                    Duration::from_millis(80),
                ),
                AgentResult::ok(AgentRole::DevilsAdvocate, vec![], "", Duration::from_millis(500)),
            ],
        );
        assert_eq!(trace.agent_results[0].role, AgentRole::Radiologist);
        assert_eq!(trace.first_pass_elapsed_ms(), 80);
        assert!(trace.result_for(AgentRole::Internist).is_some());
        assert!(trace.result_for(AgentRole::Orchestrator).is_none());
    }
}
