use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use tracing::debug;

/// The inner-catalog record that satisfied the box test for a sampled outer
/// index.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchPartner {
    pub inner: usize,
    pub inner_id: String,
    pub dra_arcsec: f64,
    pub ddec_arcsec: f64,
}

/// Sampled progress of one worker, emitted every
/// [`PROGRESS_SAMPLE_INTERVAL`](crate::consts::PROGRESS_SAMPLE_INTERVAL)
/// outer indices.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressEvent {
    pub worker: usize,
    /// Processed share of the worker's assigned range, truncated.
    pub percent: u32,
    pub outer: usize,
    pub outer_id: String,
    /// `None` when the sampled outer index found no partner.
    pub partner: Option<MatchPartner>,
}

/// Receives events from matching workers.
///
/// Called concurrently from every worker thread; events from different
/// workers interleave in no particular order. All methods default to no-ops.
pub trait MatchObserver: Send + Sync {
    /// A worker has started on its outer range.
    fn slice_started(&self, _worker: usize, _range: &Range<usize>) {}

    fn progress(&self, _event: &ProgressEvent) {}

    /// A worker has finished its range with `matched` hits.
    fn slice_finished(&self, _worker: usize, _matched: usize) {}
}

pub struct NoOpObserver;
impl MatchObserver for NoOpObserver {}

/// Writes sampled progress to the `tracing` log.
pub struct LogObserver;

impl MatchObserver for LogObserver {
    fn slice_started(&self, worker: usize, range: &Range<usize>) {
        debug!(worker, start = range.start, end = range.end, "Worker started");
    }

    fn progress(&self, event: &ProgressEvent) {
        match &event.partner {
            Some(p) => debug!(
                worker = event.worker,
                percent = event.percent,
                i1 = event.outer,
                i2 = p.inner,
                id1 = %event.outer_id,
                id2 = %p.inner_id,
                dra_arcsec = p.dra_arcsec,
                ddec_arcsec = p.ddec_arcsec,
                "Match progress"
            ),
            None => debug!(
                worker = event.worker,
                percent = event.percent,
                i1 = event.outer,
                id1 = %event.outer_id,
                "Match progress (no partner)"
            ),
        }
    }

    fn slice_finished(&self, worker: usize, matched: usize) {
        debug!(worker, matched, "Worker finished");
    }
}

/// Messages sent by [`ChannelObserver`].
#[derive(Clone, Debug, PartialEq)]
pub enum ObserverMessage {
    Started { worker: usize, range: Range<usize> },
    Progress(ProgressEvent),
    Finished { worker: usize, matched: usize },
}

/// Forwards every event over an mpsc channel so the orchestrating thread
/// can collect them. Send failures (receiver dropped) are ignored.
pub struct ChannelObserver {
    tx: mpsc::Sender<ObserverMessage>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::Sender<ObserverMessage>) -> Self {
        Self { tx }
    }
}

impl MatchObserver for ChannelObserver {
    fn slice_started(&self, worker: usize, range: &Range<usize>) {
        let _ = self.tx.send(ObserverMessage::Started {
            worker,
            range: range.clone(),
        });
    }

    fn progress(&self, event: &ProgressEvent) {
        let _ = self.tx.send(ObserverMessage::Progress(event.clone()));
    }

    fn slice_finished(&self, worker: usize, matched: usize) {
        let _ = self.tx.send(ObserverMessage::Finished { worker, matched });
    }
}

/// Cooperative cancellation flag shared between the caller and workers.
///
/// Workers check it before each outer index; matches recorded before the
/// check stay valid.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
