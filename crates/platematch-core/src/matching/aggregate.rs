use super::engine::SliceOutcome;

/// Ordered outer indices from a complete match job.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchResult {
    /// Matched (or duplicated) outer indices, ascending.
    pub indices: Vec<usize>,
    /// Set if any worker stopped early. The indices found before the stop
    /// are still correct, but ranges after it were not scanned.
    pub cancelled: bool,
}

impl MatchResult {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Indices in `0..total` that are not in this result, ascending. For a
    /// cross-catalog job these are the sources with no counterpart.
    pub fn unmatched(&self, total: usize) -> Vec<usize> {
        let mut hit = vec![false; total];
        for &i in self.indices.iter().filter(|&&i| i < total) {
            hit[i] = true;
        }
        (0..total).filter(|&i| !hit[i]).collect()
    }
}

/// Concatenate per-partition outcomes.
///
/// `outcomes` must be in partition order. Partitions are disjoint and
/// increasing, so concatenation keeps the result ascending.
pub fn aggregate(outcomes: Vec<SliceOutcome>) -> MatchResult {
    let total = outcomes.iter().map(|o| o.matched.len()).sum();
    let mut indices = Vec::with_capacity(total);
    let mut cancelled = false;
    for outcome in outcomes {
        cancelled |= outcome.cancelled;
        indices.extend(outcome.matched);
    }
    debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
    MatchResult { indices, cancelled }
}
