//! CLI command definitions

use clap::{Parser, ValueEnum};
use medpanel_domain::{OutputFormat as DomainOutputFormat, PanelMode};
use std::path::PathBuf;

/// Output format for panel reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Differential, critique, agent status and rationale
    Full,
    /// Primary diagnosis, agreement and escalation only
    Summary,
    /// The report as JSON
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => DomainOutputFormat::Full,
            OutputFormat::Summary => DomainOutputFormat::Summary,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// Which first-pass roles a case is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Dispatch every enabled role
    Full,
    /// Skip roles that read the image
    TextOnly,
}

impl From<ModeArg> for PanelMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => PanelMode::Full,
            ModeArg::TextOnly => PanelMode::TextOnly,
        }
    }
}

/// CLI arguments for medpanel
#[derive(Parser, Debug)]
#[command(name = "medpanel")]
#[command(author, version, about = "Multi-agent diagnostic panel with human escalation")]
#[command(long_about = r#"
medpanel runs a panel of specialist agents over a clinical case and reports
a consolidated differential diagnosis.

The panel has three stages:
1. First pass: Radiologist, Internist and Evidence Reviewer analyze the case in parallel
2. Adversarial review: a Devil's Advocate critiques the surviving opinions
3. Consensus: the differential is merged, agreement scored, and the case
   escalated to a human when agreement is low or a critical concern is raised

Configuration files are loaded from (in priority order):
1. MEDPANEL_* environment variables
2. --config <path>     Explicit config file
3. ./medpanel.toml     Project-level config
4. ~/.config/medpanel/config.toml   Global config

Example:
  medpanel --notes "58M, fever, productive cough" --image chest.png
  medpanel --notes-file case.txt --mode text-only -o json
"#)]
pub struct Cli {
    /// Clinical notes (alternative to --notes)
    #[arg(value_name = "NOTES", conflicts_with_all = ["notes", "notes_file"])]
    pub notes_positional: Option<String>,

    /// Clinical notes
    #[arg(short, long, value_name = "TEXT", conflicts_with = "notes_file")]
    pub notes: Option<String>,

    /// Read clinical notes from a file
    #[arg(long, value_name = "PATH")]
    pub notes_file: Option<PathBuf>,

    /// Image attached to the case (PNG, JPEG, GIF, WebP)
    #[arg(short, long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Panel mode [default: full with --image, text-only without]
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Agreement score (0-100) below which the case is escalated
    #[arg(long, value_name = "SCORE", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,

    /// Skip the adversarial review stage
    #[arg(long)]
    pub no_review: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Inline notes, from `--notes` or the positional argument
    pub fn inline_notes(&self) -> Option<&str> {
        self.notes.as_deref().or(self.notes_positional.as_deref())
    }

    /// Mode for a case: `--mode`, else the configured mode, else chosen by
    /// whether the case has an image
    pub fn panel_mode(&self, configured: Option<PanelMode>, has_image: bool) -> PanelMode {
        self.mode
            .map(PanelMode::from)
            .or(configured)
            .unwrap_or(if has_image {
                PanelMode::Full
            } else {
                PanelMode::TextOnly
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_sources() {
        let cli = Cli::try_parse_from(["medpanel", "fever and cough"]).unwrap();
        assert_eq!(cli.inline_notes(), Some("fever and cough"));

        let cli = Cli::try_parse_from(["medpanel", "--notes", "dyspnea"]).unwrap();
        assert_eq!(cli.inline_notes(), Some("dyspnea"));

        let cli = Cli::try_parse_from(["medpanel", "--notes-file", "case.txt"]).unwrap();
        assert_eq!(cli.inline_notes(), None);
        assert_eq!(cli.notes_file, Some(PathBuf::from("case.txt")));
    }

    #[test]
    fn test_conflicting_notes_rejected() {
        assert!(Cli::try_parse_from(["medpanel", "a", "--notes", "b"]).is_err());
        assert!(Cli::try_parse_from(["medpanel", "--notes", "b", "--notes-file", "x"]).is_err());
    }

    #[test]
    fn test_overrides_parse() {
        let cli = Cli::try_parse_from([
            "medpanel",
            "--notes",
            "cough",
            "--image",
            "xray.png",
            "--mode",
            "text-only",
            "--threshold",
            "80",
            "--no-review",
            "-o",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.image, Some(PathBuf::from("xray.png")));
        assert_eq!(cli.mode.map(PanelMode::from), Some(PanelMode::TextOnly));
        assert_eq!(cli.threshold, Some(80));
        assert!(cli.no_review);
        assert_eq!(cli.output.map(DomainOutputFormat::from), Some(DomainOutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_mode_follows_image_unless_set() {
        let cli = Cli::try_parse_from(["medpanel", "x"]).unwrap();
        assert_eq!(cli.panel_mode(None, false), PanelMode::TextOnly);
        assert_eq!(cli.panel_mode(None, true), PanelMode::Full);
        assert_eq!(cli.panel_mode(Some(PanelMode::Full), false), PanelMode::Full);

        let cli = Cli::try_parse_from(["medpanel", "x", "--mode", "full"]).unwrap();
        assert_eq!(cli.panel_mode(Some(PanelMode::TextOnly), false), PanelMode::Full);
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["medpanel", "x", "--threshold", "101"]).is_err());
    }

    #[test]
    fn test_defaults_leave_config_in_charge() {
        let cli = Cli::try_parse_from(["medpanel", "x"]).unwrap();
        assert_eq!(cli.mode, None);
        assert_eq!(cli.output, None);
        assert_eq!(cli.threshold, None);
        assert!(!cli.no_review);
    }
}
