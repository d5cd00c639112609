use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use crate::catalog::Catalog;
use crate::config::MatchConfig;
use crate::consts::ARCSEC_PER_DEG;
use crate::error::{PlatematchError, Result};

use super::aggregate::{aggregate, MatchResult};
use super::engine::{CrossMatchEngine, SliceOutcome};
use super::partition::partition;
use super::progress::{CancelToken, MatchObserver};

/// A validated match job: partitions the outer range, runs one worker per
/// partition and joins the results in partition order.
#[derive(Clone, Debug)]
pub struct MatchJob {
    config: MatchConfig,
}

impl MatchJob {
    pub fn new(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Indices of `catalog1` with a counterpart in `catalog2`.
    pub fn run_cross(
        &self,
        catalog1: &Catalog,
        catalog2: &Catalog,
        observer: &dyn MatchObserver,
        cancel: &CancelToken,
    ) -> Result<MatchResult> {
        let engine = CrossMatchEngine::cross_catalog(catalog1, catalog2, self.config.tolerance)?;
        info!(
            outer = catalog1.name(),
            inner = catalog2.name(),
            outer_len = catalog1.len(),
            inner_len = catalog2.len(),
            "Cross-catalog match"
        );
        self.run(&engine, observer, cancel)
    }

    /// Indices of `catalog` that duplicate a later record.
    pub fn run_duplicates(
        &self,
        catalog: &Catalog,
        observer: &dyn MatchObserver,
        cancel: &CancelToken,
    ) -> Result<MatchResult> {
        let engine = CrossMatchEngine::duplicates(catalog, self.config.tolerance)?;
        info!(
            catalog = catalog.name(),
            len = catalog.len(),
            "Duplicate search"
        );
        self.run(&engine, observer, cancel)
    }

    fn run(
        &self,
        engine: &CrossMatchEngine<'_>,
        observer: &dyn MatchObserver,
        cancel: &CancelToken,
    ) -> Result<MatchResult> {
        let range = self.config.outer_range_for(engine.outer_len());
        engine.check_range(&range)?;
        let partitions = partition(range.clone(), self.config.worker_count)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_count)
            .thread_name(|i| format!("platematch-worker-{i}"))
            .build()
            .map_err(|e| PlatematchError::Config(format!("cannot start worker pool: {e}")))?;

        let started = Instant::now();
        info!(
            mode = %engine.mode(),
            start = range.start,
            end = range.end,
            workers = self.config.worker_count,
            tolerance_arcsec = engine.tolerance() * ARCSEC_PER_DEG,
            "Starting match workers"
        );

        // Ordered collect: outcomes come back in partition order, and the
        // first failing worker fails the whole job.
        let outcomes: Vec<SliceOutcome> = pool.install(|| {
            partitions
                .into_par_iter()
                .enumerate()
                .map(|(worker, slice)| run_worker(engine, worker, slice, observer, cancel))
                .collect::<Result<Vec<_>>>()
        })?;

        let result = aggregate(outcomes);
        info!(
            matched = result.len(),
            cancelled = result.cancelled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Match job finished"
        );
        Ok(result)
    }
}

/// Run one slice, turning a panic into a worker error.
fn run_worker(
    engine: &CrossMatchEngine<'_>,
    worker: usize,
    slice: std::ops::Range<usize>,
    observer: &dyn MatchObserver,
    cancel: &CancelToken,
) -> Result<SliceOutcome> {
    catch_unwind(AssertUnwindSafe(|| {
        engine.run_slice(worker, slice, observer, cancel)
    }))
    .unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "worker panicked".into());
        Err(PlatematchError::Worker { worker, message })
    })
}
