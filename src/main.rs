use clap::Parser;
use normlab::{LabBatch, NormlabConfig, NormlabResult, Roster};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Normalize a lab submission package and screen it for similar works.
#[derive(Parser, Debug)]
#[command(name = "normlab", version, about)]
struct Args {
    /// Roster CSV (header row; number in the first field, short name in the third)
    roster: PathBuf,

    /// Lab package: a zip holding one archive per student
    package: PathBuf,

    /// Configuration file
    #[arg(long, default_value = ".normlab.toml")]
    config: PathBuf,

    /// Similarity report output path (overrides the configured one)
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> NormlabResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = NormlabConfig::load(&args.config)?;
    if let Some(report) = args.report {
        config.report_path = report.to_string_lossy().into_owned();
    }

    let roster = Roster::load(&args.roster)?;
    info!("Loaded roster with {} students", roster.len());

    let batch = LabBatch::process_package(&args.package, &roster, &config)?;
    info!(
        "Normalized {} submissions into {}",
        batch.assignments().len(),
        batch.base_path().display()
    );

    let groups = batch.check(&config)?;
    if groups.is_empty() {
        info!("No similar works found");
    } else {
        info!(
            "{} similar group(s) written to {}",
            groups.len(),
            config.report_path
        );
    }

    for diagnostic in batch.diagnostics() {
        info!("note: {}", diagnostic.detail);
    }
    Ok(())
}
