//! hcpcs-infer - run HCPCS code inference over a CSV of coverage policies.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use hcpcs_inference::input::load_policies;
use hcpcs_inference::output::{RowReport, RunSummary};
use hcpcs_inference::producers::build_producers;
use hcpcs_inference::reference::HcpcsReference;
use hcpcs_inference::{InferenceEngine, PipelineConfig};

/// hcpcs-infer - infer HCPCS codes for coverage policy text
#[derive(Parser, Debug)]
#[command(name = "hcpcs-infer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// CSV with a `policy_text` column
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the JSON results
    #[arg(short, long)]
    output: PathBuf,

    /// HCPCS reference CSV (`code`, `description`)
    #[arg(short, long, default_value = "hcpcs.csv")]
    reference: PathBuf,

    /// Pipeline configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the confidence threshold
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Include raw evidence for every row
    #[arg(long)]
    include_evidence: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let start = Instant::now();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.pipeline.confidence_threshold = threshold;
        config.validate().context("invalid --threshold")?;
    }

    let reference = Arc::new(
        HcpcsReference::load_csv(&cli.reference, config.pipeline.reference_version.clone())
            .with_context(|| format!("failed to load reference data {}", cli.reference.display()))?,
    );
    info!(
        codes = reference.len(),
        version = reference.version(),
        "Reference data loaded"
    );

    let producers = build_producers(&config.producers, &reference)?;
    let engine = InferenceEngine::new(producers, reference, config.pipeline.clone())
        .context("failed to build inference engine")?;

    let policies = load_policies(&cli.input)
        .with_context(|| format!("failed to load policies {}", cli.input.display()))?;
    info!(policies = policies.len(), "Policies loaded");

    let rows = engine.run_rows(&policies)?;

    let reports = rows
        .iter()
        .map(|row| RowReport::from_row(row, cli.include_evidence))
        .collect::<Result<Vec<_>, _>>()?;
    let json = serde_json::to_string_pretty(&reports)?;
    fs::write(&cli.output, json)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    let summary = RunSummary::from_rows(&rows);
    info!(
        policies = summary.policies_processed,
        with_codes = summary.policies_with_codes,
        codes = summary.total_codes_found,
        evidence = summary.total_evidence,
        degraded = summary.degraded_producer_runs,
        elapsed_ms = start.elapsed().as_millis() as u64,
        output = %cli.output.display(),
        "Inference complete"
    );

    Ok(())
}
