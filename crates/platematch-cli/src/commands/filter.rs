use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use platematch_core::io::write_catalog;

use super::shared::{load_catalog, read_config};
use crate::summary::print_filter_report;

#[derive(Args)]
pub struct FilterArgs {
    /// Detection table (CSV)
    pub file: PathBuf,

    /// Match config file (TOML); only the quality thresholds are used
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the surviving detections to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &FilterArgs) -> Result<()> {
    let config = read_config(args.config.as_deref())?;
    config.quality.validate()?;

    let report = load_catalog(&args.file, &config.quality)?;
    print_filter_report(&report, &config.quality);

    if let Some(ref path) = args.output {
        write_catalog(path, &report.catalog)
            .with_context(|| format!("Failed to write catalog to {}", path.display()))?;
        println!("Filtered catalog saved to {}", path.display());
    }

    Ok(())
}
