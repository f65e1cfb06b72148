//! Output formatter trait

use medpanel_domain::{OutputFormat, PanelReport};

/// Trait for rendering panel reports
pub trait ReportFormatter {
    /// Format the complete report
    fn format(&self, report: &PanelReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &PanelReport) -> String;

    /// Format the decision only (concise output)
    fn format_summary(&self, report: &PanelReport) -> String;

    /// Dispatch on the configured format
    fn render(&self, report: &PanelReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(report),
            OutputFormat::Summary => self.format_summary(report),
            OutputFormat::Json => self.format_json(report),
        }
    }
}
