use serde::{Deserialize, Serialize};

use crate::error::{PlatematchError, Result};

/// A position on the sky, ICRS degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkyCoord {
    pub ra: f64,
    pub dec: f64,
}

impl SkyCoord {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }
}

/// A zero-based pixel position. Integer values are pixel centres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: f64,
    pub y: f64,
}

impl PixelCoord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single source extracted from a plate image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub source_id: String,
    pub pixel: PixelCoord,
    pub sky: SkyCoord,
    pub flux: f64,
    /// Full width at half maximum from the Gaussian fit, in pixels.
    pub fwhm: f64,
    /// Quality of fit. Zero is a perfect Gaussian.
    pub qfit: f64,
    /// Central-pixel fit, used as a sharpness measure.
    pub cfit: f64,
    pub flags: u32,
}

/// A detection row as it appears in an extraction table. Every field is
/// optional so that incomplete rows can be reported instead of aborting
/// the whole load.
///
/// Values that fail to parse are read as missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub x_source: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub y_source: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub ra_icrs: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub dec_icrs: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub flux: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub fwhm_fit: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub qfit: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub cfit: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub flags: Option<u32>,
}

impl RawDetection {
    /// Convert into a complete record. `row` is only used for the error.
    pub fn into_record(self, row: usize) -> Result<DetectionRecord> {
        fn required<T>(value: Option<T>, row: usize, field: &str) -> Result<T> {
            value.ok_or_else(|| PlatematchError::Data {
                row,
                message: format!("missing required field `{field}`"),
            })
        }

        let source_id = required(self.source_id, row, "source_id")?;
        if source_id.trim().is_empty() {
            return Err(PlatematchError::Data {
                row,
                message: "empty `source_id`".into(),
            });
        }

        Ok(DetectionRecord {
            source_id,
            pixel: PixelCoord::new(
                required(self.x_source, row, "x_source")?,
                required(self.y_source, row, "y_source")?,
            ),
            sky: SkyCoord::new(
                required(self.ra_icrs, row, "ra_icrs")?,
                required(self.dec_icrs, row, "dec_icrs")?,
            ),
            flux: required(self.flux, row, "flux")?,
            fwhm: required(self.fwhm_fit, row, "fwhm_fit")?,
            qfit: required(self.qfit, row, "qfit")?,
            cfit: required(self.cfit, row, "cfit")?,
            flags: required(self.flags, row, "flags")?,
        })
    }
}

impl From<&DetectionRecord> for RawDetection {
    fn from(record: &DetectionRecord) -> Self {
        Self {
            source_id: Some(record.source_id.clone()),
            x_source: Some(record.pixel.x),
            y_source: Some(record.pixel.y),
            ra_icrs: Some(record.sky.ra),
            dec_icrs: Some(record.sky.dec),
            flux: Some(record.flux),
            fwhm_fit: Some(record.fwhm),
            qfit: Some(record.qfit),
            cfit: Some(record.cfit),
            flags: Some(record.flags),
        }
    }
}

/// Ordered detections from one plate. Positions in `records` are the index
/// space used by the matcher.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    pub label: Option<String>,
    pub records: Vec<DetectionRecord>,
}

impl Catalog {
    pub fn new(records: Vec<DetectionRecord>) -> Self {
        Self {
            label: None,
            records,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DetectionRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectionRecord> {
        self.records.iter()
    }

    /// Ordered subsequence of the records satisfying `keep`. The label is
    /// carried over.
    pub fn retain_by<F>(&self, mut keep: F) -> Catalog
    where
        F: FnMut(&DetectionRecord) -> bool,
    {
        Catalog {
            label: self.label.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Display name for log lines.
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or("catalog")
    }
}

impl std::ops::Index<usize> for Catalog {
    type Output = DetectionRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}
