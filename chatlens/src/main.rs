//! chatlens - chat export activity analyzer
//!
//! Reads an exported chat history, ranks contributors by volume and reports
//! whose activity tracks whose.

mod render;

use anyhow::{Context, Result};
use chatlens_core::{analyze, Config, IngestCoordinator};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chatlens")]
#[command(about = "Contributor statistics and trigger detection for chat exports")]
#[command(version)]
struct Args {
    /// Directory containing the exported HTML files
    #[arg(short, long)]
    directory: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Forget history up to and including this day (format: YYYY-MM-DD)
    #[arg(long)]
    amnesty: Option<NaiveDate>,

    /// Number of contributors to show
    #[arg(long)]
    top: Option<usize>,

    /// Extend every timeline flat up to today
    #[arg(long)]
    extend_to_today: bool,

    /// Use this configuration file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    let _log_guard = chatlens_core::logging::init(&config.logging).ok();

    // Command-line flags take precedence over the config file
    if args.amnesty.is_some() {
        config.analysis.amnesty_cutoff = args.amnesty;
    }
    if let Some(top) = args.top {
        config.analysis.top_contributors = top;
    }
    if args.extend_to_today {
        config.analysis.extend_to_today = true;
    }
    config
        .analysis
        .validate()
        .context("invalid analysis options")?;

    let format = match args.export.as_deref() {
        None => OutputFormat::Terminal,
        Some("md") | Some("markdown") => OutputFormat::Markdown,
        Some("json") => OutputFormat::Json,
        Some(other) => anyhow::bail!("Unknown export format '{}'. Use 'md' or 'json'.", other),
    };

    let coordinator = IngestCoordinator::new(config.ingest.clone());
    let ingested = coordinator
        .ingest_dir_with_progress(&args.directory, |_, _, path| {
            eprintln!("Parsing file: {}", path.display());
        })
        .with_context(|| format!("failed to read export from {}", args.directory.display()))?;

    for path in &ingested.files_with_replacements {
        eprintln!(
            "Warning: {} contained invalid UTF-8; affected characters were replaced",
            path.display()
        );
    }
    tracing::info!(
        files = ingested.files_parsed,
        messages = ingested.messages.len(),
        discarded = ingested.stats.discarded,
        "Export ingested"
    );

    let params = config.analysis.params(Local::now().date_naive());
    let report = analyze(&ingested.messages, &params).context("failed to analyze messages")?;

    let top = config.analysis.top_contributors;
    let rendered = match format {
        OutputFormat::Terminal => {
            render::render_terminal(&report, top).context("failed to render report")?
        }
        OutputFormat::Markdown => {
            render::render_markdown(&report, top).context("failed to render report")?
        }
        OutputFormat::Json => report.to_json().context("failed to serialize report")?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Markdown,
    Json,
}
