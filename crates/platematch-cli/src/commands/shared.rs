use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use platematch_core::config::MatchConfig;
use platematch_core::consts::ARCSEC_PER_DEG;
use platematch_core::io::read_raw_detections;
use platematch_core::matching::{
    ChannelObserver, LogObserver, MatchObserver, MatchResult, ObserverMessage,
};
use platematch_core::pipeline::prepare_catalog;
use platematch_core::quality::{FilterReport, QualityThresholds};
use tracing::debug;

/// Options shared by the matching commands.
#[derive(Args)]
pub struct MatchOptions {
    /// Match config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Half-width of the matching box, in arcseconds
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// First outer index to scan
    #[arg(long, requires = "end")]
    pub start: Option<usize>,

    /// One past the last outer index to scan
    #[arg(long, requires = "start")]
    pub end: Option<usize>,

    /// Log sampled progress instead of drawing a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub fn read_config(path: Option<&Path>) -> Result<MatchConfig> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents).context("Invalid match config")
        }
        None => Ok(MatchConfig::default()),
    }
}

/// Config file (or defaults) with command-line overrides applied.
pub fn load_config(opts: &MatchOptions) -> Result<MatchConfig> {
    let mut config = read_config(opts.config.as_deref())?;
    if let Some(workers) = opts.workers {
        config.worker_count = workers;
    }
    if let Some(arcsec) = opts.tolerance {
        config.tolerance = arcsec / ARCSEC_PER_DEG;
    }
    if let (Some(start), Some(end)) = (opts.start, opts.end) {
        config.outer_range = Some([start, end]);
    }
    config.validate()?;
    debug!(?config, "Match config loaded");
    Ok(config)
}

pub fn load_catalog(path: &Path, thresholds: &QualityThresholds) -> Result<FilterReport> {
    let rows = read_raw_detections(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(prepare_catalog(rows, &label, thresholds))
}

/// Run a match job, reporting progress as selected by `opts`.
pub fn run_observed<F>(opts: &MatchOptions, total: usize, job: F) -> Result<MatchResult>
where
    F: FnOnce(&dyn MatchObserver) -> platematch_core::error::Result<MatchResult> + Send,
{
    if opts.no_progress {
        Ok(job(&LogObserver)?)
    } else {
        run_with_progress(total, job)
    }
}

/// Run a match job on a scoped thread while this thread drains its
/// progress events into a progress bar.
pub fn run_with_progress<F>(total: usize, job: F) -> Result<MatchResult>
where
    F: FnOnce(&dyn MatchObserver) -> platematch_core::error::Result<MatchResult> + Send,
{
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:12} [{bar:40}] {pos}/{len} ({elapsed})")?
            .progress_chars("=> "),
    );
    pb.set_message("Matching");

    let (tx, rx) = mpsc::channel();
    let outcome = std::thread::scope(|s| {
        let handle = s.spawn(move || {
            let observer = ChannelObserver::new(tx);
            job(&observer)
        });

        // Per-worker (assigned, estimated done) pairs.
        let mut workers: Vec<(usize, usize)> = Vec::new();
        for message in rx {
            match message {
                ObserverMessage::Started { worker, range } => {
                    if workers.len() <= worker {
                        workers.resize(worker + 1, (0, 0));
                    }
                    workers[worker] = (range.len(), 0);
                }
                ObserverMessage::Progress(event) => {
                    if let Some(slot) = workers.get_mut(event.worker) {
                        slot.1 = slot.0 * event.percent as usize / 100;
                    }
                }
                ObserverMessage::Finished { worker, .. } => {
                    if let Some(slot) = workers.get_mut(worker) {
                        slot.1 = slot.0;
                    }
                }
            }
            pb.set_position(workers.iter().map(|w| w.1).sum::<usize>() as u64);
        }

        handle.join()
    });

    close_bar(&pb, outcome)
}

/// Finish the bar on success, abandon it on any failure.
fn close_bar(
    pb: &ProgressBar,
    outcome: std::thread::Result<platematch_core::error::Result<MatchResult>>,
) -> Result<MatchResult> {
    match outcome {
        Ok(Ok(result)) => {
            pb.finish_with_message("Done");
            Ok(result)
        }
        Ok(Err(e)) => {
            pb.abandon_with_message("Failed");
            Err(e.into())
        }
        Err(_) => {
            pb.abandon_with_message("Failed");
            Err(anyhow!("Match thread panicked"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platematch_core::error::PlatematchError;

    #[test]
    fn test_failed_job_closes_bar() {
        let pb = ProgressBar::hidden();
        let outcome = Ok(Err(PlatematchError::Config("bad range".into())));
        assert!(close_bar(&pb, outcome).is_err());
        assert!(pb.is_finished());
    }

    #[test]
    fn test_panicked_job_closes_bar() {
        let pb = ProgressBar::hidden();
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert!(close_bar(&pb, Err(payload)).is_err());
        assert!(pb.is_finished());
    }

    #[test]
    fn test_failed_job_through_progress_runner() {
        let err = run_with_progress(10, |_observer| {
            Err(PlatematchError::Config("bad range".into()))
        })
        .unwrap_err();
        assert!(err.to_string().contains("bad range"), "got: {err}");
    }

    #[test]
    fn test_successful_job_returns_result() {
        let result = run_with_progress(3, |_observer| {
            Ok(MatchResult {
                indices: vec![1],
                cancelled: false,
            })
        })
        .unwrap();
        assert_eq!(result.indices, vec![1]);
    }
}
