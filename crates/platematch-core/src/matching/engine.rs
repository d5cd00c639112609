use std::ops::Range;

use crate::catalog::Catalog;
use crate::consts::{ARCSEC_PER_DEG, PROGRESS_SAMPLE_INTERVAL};
use crate::error::{PlatematchError, Result};

use super::mode::{within_tolerance_box, BoxOffset, MatchMode};
use super::progress::{CancelToken, MatchObserver, MatchPartner, ProgressEvent};

/// Matches held by one worker after scanning its outer range.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceOutcome {
    pub worker: usize,
    pub range: Range<usize>,
    /// Outer indices with a partner, ascending.
    pub matched: Vec<usize>,
    /// Outer indices fully scanned before the slice stopped.
    pub processed: usize,
    pub cancelled: bool,
}

/// Tolerance-box nested search over an outer and an inner catalog.
///
/// For each outer index the inner candidates given by the [`MatchMode`] are
/// scanned in ascending order and the first one inside the box wins. The
/// closest partner is not searched for.
///
/// The engine only borrows the catalogs; any number of workers may run
/// slices of the same engine concurrently.
#[derive(Clone, Copy, Debug)]
pub struct CrossMatchEngine<'a> {
    outer: &'a Catalog,
    inner: &'a Catalog,
    mode: MatchMode,
    tolerance: f64,
}

impl<'a> CrossMatchEngine<'a> {
    /// Engine for finding which `outer` detections reappear in `inner`.
    pub fn cross_catalog(outer: &'a Catalog, inner: &'a Catalog, tolerance: f64) -> Result<Self> {
        Self::new(outer, inner, MatchMode::CrossCatalog, tolerance)
    }

    /// Engine for finding duplicated detections within one catalog.
    pub fn duplicates(catalog: &'a Catalog, tolerance: f64) -> Result<Self> {
        Self::new(catalog, catalog, MatchMode::Duplicates, tolerance)
    }

    fn new(
        outer: &'a Catalog,
        inner: &'a Catalog,
        mode: MatchMode,
        tolerance: f64,
    ) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(PlatematchError::Config(format!(
                "tolerance must be a non-negative finite number of degrees, got {tolerance}"
            )));
        }
        Ok(Self {
            outer,
            inner,
            mode,
            tolerance,
        })
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn outer_len(&self) -> usize {
        self.outer.len()
    }

    /// First inner index inside the tolerance box around outer index `i1`.
    ///
    /// Panics if `i1` is out of bounds for the outer catalog.
    pub fn first_match(&self, i1: usize) -> Option<(usize, BoxOffset)> {
        let sky = self.outer[i1].sky;
        self.mode
            .candidates(i1, self.inner.len())
            .find_map(|i2| {
                within_tolerance_box(sky, self.inner[i2].sky, self.tolerance).map(|o| (i2, o))
            })
    }

    /// Check that `range` is a valid half-open slice of the outer catalog.
    pub fn check_range(&self, range: &Range<usize>) -> Result<()> {
        if range.start > range.end {
            return Err(PlatematchError::Config(format!(
                "outer range start {} is after end {}",
                range.start, range.end
            )));
        }
        if range.end > self.outer.len() {
            return Err(PlatematchError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len: self.outer.len(),
            });
        }
        Ok(())
    }

    /// Scan outer indices `range` on behalf of `worker`.
    ///
    /// The range is validated before anything is scanned. Every outer index
    /// that is a multiple of the sampling interval produces one progress
    /// event. If `cancel` fires, the matches found so far are returned with
    /// `cancelled` set.
    pub fn run_slice(
        &self,
        worker: usize,
        range: Range<usize>,
        observer: &dyn MatchObserver,
        cancel: &CancelToken,
    ) -> Result<SliceOutcome> {
        self.check_range(&range)?;
        observer.slice_started(worker, &range);

        let assigned = range.len();
        let mut processed = 0usize;
        let mut matched = Vec::new();
        let mut cancelled = false;

        for i1 in range.clone() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            processed += 1;

            let hit = self.first_match(i1);
            if hit.is_some() {
                matched.push(i1);
            }

            if i1 % PROGRESS_SAMPLE_INTERVAL == 0 {
                observer.progress(&self.progress_event(worker, i1, processed, assigned, hit));
            }
        }

        observer.slice_finished(worker, matched.len());
        Ok(SliceOutcome {
            worker,
            range,
            matched,
            processed,
            cancelled,
        })
    }

    /// Scan the whole outer catalog as a single slice.
    pub fn run_all(&self, observer: &dyn MatchObserver) -> Result<Vec<usize>> {
        let outcome = self.run_slice(0, 0..self.outer.len(), observer, &CancelToken::new())?;
        Ok(outcome.matched)
    }

    fn progress_event(
        &self,
        worker: usize,
        i1: usize,
        processed: usize,
        assigned: usize,
        hit: Option<(usize, BoxOffset)>,
    ) -> ProgressEvent {
        let percent = (processed as u64 * 100 / assigned.max(1) as u64) as u32;
        ProgressEvent {
            worker,
            percent,
            outer: i1,
            outer_id: self.outer[i1].source_id.clone(),
            partner: hit.map(|(i2, offset)| MatchPartner {
                inner: i2,
                inner_id: self.inner[i2].source_id.clone(),
                dra_arcsec: offset.dra * ARCSEC_PER_DEG,
                ddec_arcsec: offset.ddec * ARCSEC_PER_DEG,
            }),
        }
    }
}
