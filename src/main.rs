//! Storm Impact - command-line report over the storm event dataset.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use storm_impact::charts::StaticChartRenderer;
use storm_impact::config::{Overrides, ReportConfig};
use storm_impact::{report, StormPipeline};

#[derive(Parser)]
#[command(name = "storm_impact")]
#[command(about = "Rank storm event types by health and economic impact", long_about = None)]
struct Cli {
    /// Storm event CSV
    input: Option<PathBuf>,
    /// JSON config file; command-line values override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Rows shown per ranked table
    #[arg(long)]
    top: Option<usize>,
    /// Write the decade histogram as PNG
    #[arg(long)]
    histogram: Option<PathBuf>,
    /// Write the full report as JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let base = match &cli.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    };
    let config = base.with_overrides(Overrides {
        input: cli.input,
        top: cli.top,
        histogram: cli.histogram,
        json: cli.json,
    });
    let input = config.input()?;

    info!("analyzing {}", input.display());
    let mut pipeline = StormPipeline::new();
    let impact = pipeline
        .run(input)
        .with_context(|| format!("failed to analyze {}", input.display()))?;

    print!("{}", report::render_text(&impact, config.top));

    if let Some(path) = &config.histogram {
        StaticChartRenderer::render_decade_histogram(&impact.decades, path, config.histogram_size)
            .with_context(|| format!("failed to write histogram {}", path.display()))?;
        println!("Histogram written to {}.", path.display());
    }

    if let Some(path) = &config.json {
        let json = serde_json::to_string_pretty(&impact)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        println!("Report written to {}.", path.display());
    }

    Ok(())
}
