//! Progress reporting for panel runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use medpanel_application::ProgressNotifier;
use medpanel_domain::{AgentResult, AgentStatus, PanelStage};
use std::sync::Mutex;

/// Reports progress during a panel run with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn stage_display_name(stage: PanelStage) -> &'static str {
        match stage {
            PanelStage::Dispatching => "Stage 1: First Pass",
            PanelStage::Reviewing => "Stage 2: Adversarial Review",
            PanelStage::Synthesizing => "Stage 3: Synthesis",
            other => other.display_name(),
        }
    }

    fn stage_short_name(stage: PanelStage) -> &'static str {
        match stage {
            PanelStage::Dispatching => "Stage 1",
            PanelStage::Reviewing => "Stage 2",
            PanelStage::Synthesizing => "Stage 3",
            other => other.display_name(),
        }
    }

    fn position(&self) -> Option<u64> {
        self.stage_bar
            .lock()
            .ok()
            .and_then(|bar| bar.as_ref().map(|b| b.position()))
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: PanelStage, total_agents: usize) {
        let pb = self.multi.add(ProgressBar::new(total_agents as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(Self::stage_display_name(stage));
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.stage_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_agent_complete(&self, _stage: PanelStage, result: &AgentResult) {
        if let Ok(slot) = self.stage_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(format!("{} {}", status_mark(result.status), result.role));
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: PanelStage) {
        if let Ok(mut slot) = self.stage_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} complete!", Self::stage_short_name(stage).green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Writes to stderr so report output on stdout stays machine-readable.
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: PanelStage, total_agents: usize) {
        eprintln!(
            "{} {} ({} agents)",
            "->".cyan(),
            ProgressReporter::stage_display_name(stage).bold(),
            total_agents
        );
    }

    fn on_agent_complete(&self, _stage: PanelStage, result: &AgentResult) {
        eprintln!("{}", agent_line(result));
    }

    fn on_stage_complete(&self, _stage: PanelStage) {
        eprintln!();
    }
}

fn status_mark(status: AgentStatus) -> colored::ColoredString {
    match status {
        AgentStatus::Ok => "v".green(),
        AgentStatus::TimedOut => "~".yellow(),
        AgentStatus::Failed => "x".red(),
        AgentStatus::Skipped => "-".dimmed(),
    }
}

fn agent_line(result: &AgentResult) -> String {
    match &result.failure {
        None => format!("  {} {}", status_mark(result.status), result.role),
        Some(failure) => format!(
            "  {} {} ({})",
            status_mark(result.status),
            result.role,
            failure
        ),
    }
}
