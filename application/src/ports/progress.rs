//! Progress notification port
//!
//! Defines the interface for reporting progress during a panel run.

use medpanel_domain::{AgentResult, PanelStage};

/// Callback for progress updates during a panel run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: PanelStage, total_agents: usize);

    /// Called when an agent of the stage has a result
    fn on_agent_complete(&self, stage: PanelStage, result: &AgentResult);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: PanelStage);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: PanelStage, _total_agents: usize) {}
    fn on_agent_complete(&self, _stage: PanelStage, _result: &AgentResult) {}
    fn on_stage_complete(&self, _stage: PanelStage) {}
}
