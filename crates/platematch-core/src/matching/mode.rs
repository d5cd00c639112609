use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::catalog::SkyCoord;

/// Which inner indices are candidates for a given outer index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Outer and inner are different catalogs; every inner index is a
    /// candidate.
    #[default]
    CrossCatalog,
    /// Outer and inner are the same catalog; only indices after the outer
    /// one are candidates, so no record pairs with itself and each pair is
    /// evaluated once, as `(lower, higher)`.
    Duplicates,
}

impl MatchMode {
    pub fn candidates(&self, outer: usize, inner_len: usize) -> Range<usize> {
        match self {
            Self::CrossCatalog => 0..inner_len,
            Self::Duplicates => (outer + 1).min(inner_len)..inner_len,
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CrossCatalog => write!(f, "Cross-catalog"),
            Self::Duplicates => write!(f, "Duplicates"),
        }
    }
}

/// Absolute per-axis offsets of a pair that passed the box test, degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxOffset {
    pub dra: f64,
    pub ddec: f64,
}

/// Independent-axis box test: `|dra| <= tol` and `|ddec| <= tol`.
///
/// Not an angular separation: right ascension is neither scaled by
/// cos(dec) nor wrapped at 0/360. A NaN coordinate never matches.
#[inline]
pub fn within_tolerance_box(a: SkyCoord, b: SkyCoord, tolerance: f64) -> Option<BoxOffset> {
    let dra = (a.ra - b.ra).abs();
    let ddec = (a.dec - b.dec).abs();
    (dra <= tolerance && ddec <= tolerance).then_some(BoxOffset { dra, ddec })
}
