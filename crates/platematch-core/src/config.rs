use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_TOLERANCE_DEG, DEFAULT_WORKER_COUNT};
use crate::error::{PlatematchError, Result};
use crate::quality::QualityThresholds;
use crate::wcs::{ImageShape, TanWcs};

/// Settings for a match job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Half-width of the matching box, in degrees.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Number of parallel workers the outer range is split across.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Half-open `[start, end)` slice of the outer catalog to scan. The
    /// whole catalog when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_range: Option<[usize; 2]>,
    #[serde(default)]
    pub quality: QualityThresholds,
    /// Plate geometry for footprint filtering. Skipped when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint: Option<FootprintConfig>,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE_DEG
}
fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE_DEG,
            worker_count: DEFAULT_WORKER_COUNT,
            outer_range: None,
            quality: QualityThresholds::default(),
            footprint: None,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(PlatematchError::Config(format!(
                "tolerance must be a non-negative finite number of degrees, got {}",
                self.tolerance
            )));
        }
        if self.worker_count == 0 {
            return Err(PlatematchError::Config(
                "worker_count must be at least 1".into(),
            ));
        }
        if let Some([start, end]) = self.outer_range {
            if start > end {
                return Err(PlatematchError::Config(format!(
                    "outer_range start {start} is after end {end}"
                )));
            }
        }
        self.quality.validate()
    }

    /// The configured outer slice, or the whole of a catalog with `len`
    /// records.
    pub fn outer_range_for(&self, len: usize) -> Range<usize> {
        match self.outer_range {
            Some([start, end]) => start..end,
            None => 0..len,
        }
    }
}

/// Gnomonic WCS and pixel extent of one plate image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlateGeometry {
    /// Sky position of the reference pixel, degrees.
    pub crval: [f64; 2],
    /// Zero-based reference pixel.
    pub crpix: [f64; 2],
    /// Degrees per pixel, row-major.
    pub cd: [[f64; 2]; 2],
    pub width: u32,
    pub height: u32,
}

impl PlateGeometry {
    pub fn wcs(&self) -> Result<TanWcs> {
        TanWcs::new(self.crval, self.crpix, self.cd)
    }

    pub fn shape(&self) -> ImageShape {
        ImageShape::new(self.width, self.height)
    }
}

/// Geometry of both plates in a comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FootprintConfig {
    pub plate1: PlateGeometry,
    pub plate2: PlateGeometry,
}
