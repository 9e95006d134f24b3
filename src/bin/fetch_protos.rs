//! Google Ads proto fetcher CLI
//!
//! Usage:
//!   fetch-protos --out schemas --version v19

use std::path::PathBuf;

use ads_schemas::{FetchConfig, Fetcher, HttpArchive};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fetch-protos")]
#[command(about = "Fetch Google Ads protobuf definitions from the googleapis snapshot")]
struct Cli {
    /// Output dir for proto tree
    #[arg(long)]
    out: Option<PathBuf>,

    /// Google Ads API version (e.g. v19)
    #[arg(long)]
    version: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = FetchConfig::load(cli.out.as_deref(), cli.version.as_deref())?;
    let output_dir = config.output_path()?;

    let report = Fetcher::new(HttpArchive::default()).fetch(&output_dir, &config.version)?;

    if report.fell_back {
        println!(
            "⚠️  {} not available, fetched {} instead",
            report.requested_version, report.resolved_version
        );
    }
    println!(
        "✅ Wrote {} files for {} to {}",
        report.files_copied,
        report.resolved_version,
        output_dir.display()
    );
    for path in &report.materialized {
        println!("   {}", path.display());
    }

    Ok(())
}
