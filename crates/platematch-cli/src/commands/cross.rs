use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use platematch_core::matching::{CancelToken, MatchJob};
use platematch_core::pipeline::restrict_to_overlap;

use super::shared::{load_catalog, load_config, run_observed, MatchOptions};
use crate::summary::{print_filter_report, print_index_list, print_match_summary};

#[derive(Args)]
pub struct CrossArgs {
    /// Detection table of the first (older) plate
    pub catalog1: PathBuf,

    /// Detection table of the second (newer) plate
    pub catalog2: PathBuf,

    #[command(flatten)]
    pub options: MatchOptions,

    /// Also list first-plate sources without a counterpart
    #[arg(long)]
    pub show_unmatched: bool,

    /// Show at most N indices per list
    #[arg(long, default_value = "50")]
    pub limit: usize,
}

pub fn run(args: &CrossArgs) -> Result<()> {
    let config = load_config(&args.options)?;

    let report1 = load_catalog(&args.catalog1, &config.quality)?;
    print_filter_report(&report1, &config.quality);
    let report2 = load_catalog(&args.catalog2, &config.quality)?;
    print_filter_report(&report2, &config.quality);

    let (catalog1, catalog2) = match config.footprint {
        Some(ref footprint) => restrict_to_overlap(&report1.catalog, &report2.catalog, footprint)?,
        None => (report1.catalog, report2.catalog),
    };

    let job = MatchJob::new(config)?;
    print_match_summary(job.config(), &catalog1, Some(&catalog2));

    let total = job.config().outer_range_for(catalog1.len()).len();
    let cancel = CancelToken::new();
    let result = run_observed(&args.options, total, |observer| {
        job.run_cross(&catalog1, &catalog2, observer, &cancel)
    })?;

    println!(
        "\n{} of {} sources on {} have a counterpart on {}",
        result.len(),
        total,
        catalog1.name(),
        catalog2.name()
    );
    print_index_list("Matched", &result.indices, &catalog1, args.limit);

    if args.show_unmatched {
        let range = job.config().outer_range_for(catalog1.len());
        let unmatched: Vec<usize> = result
            .unmatched(range.end)
            .into_iter()
            .filter(|i| *i >= range.start)
            .collect();
        print_index_list("Unmatched", &unmatched, &catalog1, args.limit);
    }

    Ok(())
}
