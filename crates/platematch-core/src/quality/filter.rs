use tracing::{debug, warn};

use crate::catalog::{Catalog, DetectionRecord, RawDetection};
use crate::error::PlatematchError;

use super::thresholds::QualityThresholds;

/// True if a single record satisfies every threshold.
///
/// NaN values fail the strict comparisons and are therefore rejected.
pub fn passes(record: &DetectionRecord, thresholds: &QualityThresholds) -> bool {
    let flags_ok = record.flags & thresholds.flag_mask == 0;
    let qfit_ok = record.qfit < thresholds.qfit_max;
    let cfit_ok = record.cfit < thresholds.cfit_max && record.cfit > -thresholds.cfit_max;
    let fwhm_ok = thresholds.fwhm_min.is_none_or(|lo| record.fwhm >= lo)
        && thresholds.fwhm_max.is_none_or(|hi| record.fwhm <= hi);
    flags_ok && qfit_ok && cfit_ok && fwhm_ok
}

/// Remove detections with bad Gaussian fits. Order-preserving and
/// idempotent.
pub fn filter_catalog(catalog: &Catalog, thresholds: &QualityThresholds) -> Catalog {
    let filtered = catalog.retain_by(|r| passes(r, thresholds));
    debug!(
        catalog = catalog.name(),
        before = catalog.len(),
        after = filtered.len(),
        "Quality filter applied"
    );
    filtered
}

/// Outcome of validating and quality-filtering raw extraction rows.
#[derive(Debug)]
pub struct FilterReport {
    pub catalog: Catalog,
    /// One error per malformed row, in row order.
    pub malformed: Vec<PlatematchError>,
    pub total_rows: usize,
    /// Well-formed rows that failed the quality thresholds.
    pub rejected_quality: usize,
}

impl FilterReport {
    pub fn kept(&self) -> usize {
        self.catalog.len()
    }
}

/// Validate raw rows and apply [`filter_catalog`] to the well-formed ones.
///
/// Malformed rows are excluded and reported; they never abort the rest of
/// the batch.
pub fn filter_raw<I>(rows: I, thresholds: &QualityThresholds) -> FilterReport
where
    I: IntoIterator<Item = RawDetection>,
{
    let mut records = Vec::new();
    let mut malformed = Vec::new();
    let mut total_rows = 0;

    for (row, raw) in rows.into_iter().enumerate() {
        total_rows += 1;
        match raw.into_record(row) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(row, error = %e, "Skipping malformed detection");
                malformed.push(e);
            }
        }
    }

    let complete = Catalog::new(records);
    let catalog = filter_catalog(&complete, thresholds);
    let rejected_quality = complete.len() - catalog.len();

    FilterReport {
        catalog,
        malformed,
        total_rows,
        rejected_quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PixelCoord, SkyCoord};

    fn record(qfit: f64, cfit: f64, flags: u32) -> DetectionRecord {
        DetectionRecord {
            source_id: "s".into(),
            pixel: PixelCoord::default(),
            sky: SkyCoord::default(),
            flux: 1.0,
            fwhm: 6.0,
            qfit,
            cfit,
            flags,
        }
    }

    #[test]
    fn test_bounds_are_strict() {
        let t = QualityThresholds::default();
        assert!(passes(&record(4.999, 0.0, 0), &t));
        assert!(!passes(&record(5.0, 0.0, 0), &t));
        assert!(!passes(&record(0.0, 5.0, 0), &t));
        assert!(!passes(&record(0.0, -5.0, 0), &t));
        assert!(passes(&record(0.0, -4.999, 0), &t));
    }

    #[test]
    fn test_nan_is_rejected() {
        let t = QualityThresholds::default();
        assert!(!passes(&record(f64::NAN, 0.0, 0), &t));
        assert!(!passes(&record(0.0, f64::NAN, 0), &t));
    }

    #[test]
    fn test_flag_mask_selects_bits() {
        let t = QualityThresholds {
            flag_mask: 0b100,
            ..Default::default()
        };
        assert!(passes(&record(0.0, 0.0, 0b011), &t));
        assert!(!passes(&record(0.0, 0.0, 0b100), &t));
    }
}
