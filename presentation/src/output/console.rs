//! Console output formatter for panel reports

use crate::output::formatter::ReportFormatter;
use colored::Colorize;
use medpanel_domain::{AgentStatus, PanelReport, PanelTrace, Severity};

/// Formats panel reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &PanelReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Diagnostic Panel Report"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Case:".cyan().bold(), report.case_id()));
        output.push_str(&Self::decision_lines(report));

        // Differential
        output.push_str(&Self::section_header("Differential Diagnosis"));
        for (i, entry) in report.differential().iter().enumerate() {
            let roles = entry
                .supporting_roles
                .iter()
                .map(|r| r.display_name())
                .collect::<Vec<_>>()
                .join(", ");
            let line = format!("{:>2}. {:<32} {:.2}", i + 1, entry.label, entry.confidence);
            if i == 0 {
                output.push_str(&format!("{}  {}\n", line.bold(), roles.dimmed()));
            } else {
                output.push_str(&format!("{}  {}\n", line, roles.dimmed()));
            }
        }

        // Critique (if any)
        if !report.critique_notes().is_empty() {
            output.push_str(&Self::section_header("Adversarial Critique"));
            for note in report.critique_notes() {
                let tag = format!("[{}]", note.severity);
                let tag = match note.severity {
                    Severity::Critical => tag.red().bold(),
                    Severity::Warning => tag.yellow(),
                    Severity::Info => tag.dimmed(),
                };
                output.push_str(&format!("  {} {}", tag, note.concern));
                if !note.referenced_labels.is_empty() {
                    output.push_str(&format!(
                        " {}",
                        format!("({})", note.referenced_labels.join(", ")).dimmed()
                    ));
                }
                output.push('\n');
            }
        }

        // Agents
        output.push_str(&Self::section_header("Agents"));
        for (role, status) in report.agent_status() {
            output.push_str(&format!(
                "  {} {}\n",
                Self::status_mark(*status),
                format!("{:<18} {}", role.display_name(), status).as_str()
            ));
        }

        // Rationale
        if !report.rationale().is_empty() {
            output.push_str(&Self::section_header("Rationale"));
            output.push_str(&Self::indent(report.rationale(), "  "));
            output.push('\n');
        }

        // Coverage notes
        if !report.status().notes.is_empty() {
            output.push_str(&format!("\n{}\n", "Notes:".yellow().bold()));
            for note in &report.status().notes {
                output.push_str(&format!("  * {}\n", note));
            }
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &PanelReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the decision only
    pub fn format_summary(report: &PanelReport) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{}\n\n",
            "=== Diagnostic Panel Decision ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n", "Case:".dimmed(), report.case_id()));
        output.push_str(&Self::decision_lines(report));
        output
    }

    /// Per-agent timings and failure detail from a run
    pub fn format_trace(trace: &PanelTrace) -> String {
        let mut output = Self::section_header("Trace");
        let stages = trace
            .stages
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        output.push_str(&format!("  {} {}\n", "Stages:".dimmed(), stages));
        for result in &trace.agent_results {
            output.push_str(&format!(
                "  {:<18} {:<10} {:>6}ms",
                result.role.display_name(),
                result.status.as_str(),
                result.elapsed_ms
            ));
            if let Some(failure) = &result.failure {
                output.push_str(&format!("  {}", failure.to_string().dimmed()));
            }
            output.push('\n');
        }
        output
    }

    fn decision_lines(report: &PanelReport) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}\n",
            "Primary diagnosis:".cyan().bold(),
            report.primary_diagnosis().bold()
        ));
        output.push_str(&format!(
            "{} {}/100\n",
            "Panel agreement:".cyan().bold(),
            report.panel_agreement_score()
        ));

        let decision = if report.escalate_to_human() {
            let reason = report
                .escalation_reason()
                .map(|r| format!(" ({})", r))
                .unwrap_or_default();
            format!("ESCALATE TO HUMAN REVIEW{}", reason).red().bold()
        } else {
            "No escalation".green().bold()
        };
        output.push_str(&format!("{} {}\n", "Decision:".cyan().bold(), decision));
        output
    }

    fn status_mark(status: AgentStatus) -> colored::ColoredString {
        match status {
            AgentStatus::Ok => "v".green(),
            AgentStatus::TimedOut => "~".yellow(),
            AgentStatus::Failed => "x".red(),
            AgentStatus::Skipped => "-".dimmed(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format(&self, report: &PanelReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &PanelReport) -> String {
        Self::format_json(report)
    }

    fn format_summary(&self, report: &PanelReport) -> String {
        Self::format_summary(report)
    }
}
