use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CFIT_MAX, DEFAULT_FLAG_MASK, DEFAULT_QFIT_MAX};
use crate::error::{PlatematchError, Result};

/// Fit-quality criteria a detection must satisfy to take part in matching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    /// Flag bits that disqualify a detection. The default rejects any flag.
    #[serde(default = "default_flag_mask")]
    pub flag_mask: u32,
    /// Exclusive upper bound on `qfit`.
    #[serde(default = "default_qfit_max")]
    pub qfit_max: f64,
    /// `cfit` must lie strictly inside `(-cfit_max, cfit_max)`.
    #[serde(default = "default_cfit_max")]
    pub cfit_max: f64,
    /// Inclusive lower bound on the fitted FWHM, in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwhm_min: Option<f64>,
    /// Inclusive upper bound on the fitted FWHM, in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwhm_max: Option<f64>,
}

fn default_flag_mask() -> u32 {
    DEFAULT_FLAG_MASK
}
fn default_qfit_max() -> f64 {
    DEFAULT_QFIT_MAX
}
fn default_cfit_max() -> f64 {
    DEFAULT_CFIT_MAX
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            flag_mask: DEFAULT_FLAG_MASK,
            qfit_max: DEFAULT_QFIT_MAX,
            cfit_max: DEFAULT_CFIT_MAX,
            fwhm_min: None,
            fwhm_max: None,
        }
    }
}

impl QualityThresholds {
    pub fn validate(&self) -> Result<()> {
        if !(self.qfit_max.is_finite() && self.qfit_max > 0.0) {
            return Err(PlatematchError::Config(format!(
                "qfit_max must be a positive finite number, got {}",
                self.qfit_max
            )));
        }
        if !(self.cfit_max.is_finite() && self.cfit_max > 0.0) {
            return Err(PlatematchError::Config(format!(
                "cfit_max must be a positive finite number, got {}",
                self.cfit_max
            )));
        }
        if let (Some(lo), Some(hi)) = (self.fwhm_min, self.fwhm_max) {
            if lo > hi {
                return Err(PlatematchError::Config(format!(
                    "fwhm_min ({lo}) is greater than fwhm_max ({hi})"
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for QualityThresholds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "flags & {:#x} == 0, qfit < {}, |cfit| < {}",
            self.flag_mask, self.qfit_max, self.cfit_max
        )?;
        match (self.fwhm_min, self.fwhm_max) {
            (Some(lo), Some(hi)) => write!(f, ", {lo} <= fwhm <= {hi}"),
            (Some(lo), None) => write!(f, ", fwhm >= {lo}"),
            (None, Some(hi)) => write!(f, ", fwhm <= {hi}"),
            (None, None) => Ok(()),
        }
    }
}
