//! CLI entrypoint for medpanel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use medpanel_application::{NoProgress, PanelError, ProgressNotifier, RunPanelUseCase};
use medpanel_domain::{Case, ImagePayload, OutputFormat};
use medpanel_infrastructure::{
    ConfigLoader, FileConfig, JsonlReportLogger, LocalEvidenceRetriever, OpenAiCompatibleGateway,
};
use medpanel_presentation::{
    Cli, ConsoleFormatter, ProgressReporter, ReportFormatter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Exit code for a fatal panel error (no report produced)
const EXIT_PANEL_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if e.downcast_ref::<PanelError>().is_some() {
                ExitCode::from(EXIT_PANEL_FAILURE)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration before logging so [logging] can name the log file
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let log_file = cli.log_file.clone().or_else(|| config.logging.file.clone());
    let _guard = init_tracing(cli.verbose, log_file.as_deref())?;

    if cli.show_config {
        show_config(&cli, &config)?;
        return Ok(());
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting medpanel");

    // === Case ===
    let notes = read_notes(&cli)?;
    let image = match &cli.image {
        Some(path) => Some(read_image(path)?),
        None => None,
    };
    let case = Case::new(image, notes).map_err(PanelError::from)?;

    // === Configuration (CLI flags override files) ===
    let mut panel_config = config.to_panel_config()?;
    if let Some(threshold) = cli.threshold {
        panel_config = panel_config.with_threshold(threshold);
    }
    panel_config = panel_config.with_mode(cli.panel_mode(config.panel.mode, case.has_image()));
    if cli.no_review {
        panel_config = panel_config.with_adversarial_review(false);
    }

    // === Dependency Injection ===
    let gateway = Arc::new(OpenAiCompatibleGateway::new(config.inference.clone())?);
    let mut use_case = RunPanelUseCase::new(gateway, panel_config)?;

    if let Some(dir) = &config.evidence.directory {
        info!("Evidence library: {}", dir.display());
        use_case = use_case.with_evidence(Arc::new(LocalEvidenceRetriever::new(
            dir,
            config.evidence.excerpt_chars,
        )));
    }

    if let Some(path) = &config.logging.report_log {
        match JsonlReportLogger::new(path) {
            Some(logger) => use_case = use_case.with_report_logger(Arc::new(logger)),
            None => warn!("Report logging disabled: could not open {}", path.display()),
        }
    }

    // Execute with or without progress reporting
    let progress: Box<dyn ProgressNotifier> = if cli.quiet || !config.output.show_progress {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };
    let (report, trace) = use_case.analyze_with_trace(case, progress.as_ref()).await?;

    // Output results
    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    println!("{}", ConsoleFormatter.render(&report, format));
    if cli.verbose > 0 && format != OutputFormat::Json {
        println!("{}", ConsoleFormatter::format_trace(&trace));
    }

    Ok(())
}

/// Install the subscriber: stderr always, plus a log file when requested.
///
/// `RUST_LOG` overrides the level chosen by `-v`.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn show_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    println!("Configuration sources (lowest to highest priority):");
    if cli.no_config {
        println!("  defaults only (--no-config)");
    } else {
        for source in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("  {}", source);
        }
    }
    println!();
    println!("Effective configuration:");
    println!(
        "{}",
        toml::to_string_pretty(config).context("Failed to render configuration")?
    );
    Ok(())
}

fn read_notes(cli: &Cli) -> Result<String> {
    if let Some(notes) = cli.inline_notes() {
        return Ok(notes.to_string());
    }
    if let Some(path) = &cli.notes_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read notes file {}", path.display()));
    }
    bail!("Clinical notes are required. Pass them as an argument, with --notes or --notes-file.")
}

fn read_image(path: &Path) -> Result<ImagePayload> {
    let Some(media_type) = media_type_for(path) else {
        bail!(
            "Unsupported image type: {} (expected png, jpg, jpeg, gif or webp)",
            path.display()
        );
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    Ok(ImagePayload::new(bytes, media_type).map_err(PanelError::from)?)
}

/// MIME type from the file extension
fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
