use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use platematch_core::matching::{CancelToken, MatchJob};
use platematch_core::pipeline::restrict_to_plate;

use super::shared::{load_catalog, load_config, run_observed, MatchOptions};
use crate::summary::{print_filter_report, print_index_list, print_match_summary};

#[derive(Args)]
pub struct DuplicatesArgs {
    /// Detection table (CSV)
    pub catalog: PathBuf,

    #[command(flatten)]
    pub options: MatchOptions,

    /// Show at most N indices
    #[arg(long, default_value = "50")]
    pub limit: usize,
}

pub fn run(args: &DuplicatesArgs) -> Result<()> {
    let config = load_config(&args.options)?;

    let report = load_catalog(&args.catalog, &config.quality)?;
    print_filter_report(&report, &config.quality);

    let catalog = match config.footprint {
        Some(ref footprint) => restrict_to_plate(&report.catalog, &footprint.plate1)?,
        None => report.catalog,
    };

    let job = MatchJob::new(config)?;
    print_match_summary(job.config(), &catalog, None);

    let total = job.config().outer_range_for(catalog.len()).len();
    let cancel = CancelToken::new();
    let result = run_observed(&args.options, total, |observer| {
        job.run_duplicates(&catalog, observer, &cancel)
    })?;

    println!(
        "\n{} of {} sources on {} are duplicated",
        result.len(),
        total,
        catalog.name()
    );
    print_index_list("Duplicates", &result.indices, &catalog, args.limit);

    Ok(())
}
