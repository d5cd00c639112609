use tracing::info;

use crate::catalog::{Catalog, RawDetection};
use crate::config::{FootprintConfig, PlateGeometry};
use crate::error::Result;
use crate::footprint::remove_outsiders;
use crate::quality::{filter_raw, FilterReport, QualityThresholds};
use crate::wcs::Wcs;

/// Validate and quality-filter one extraction table.
pub fn prepare_catalog(
    rows: Vec<RawDetection>,
    label: &str,
    thresholds: &QualityThresholds,
) -> FilterReport {
    let mut report = filter_raw(rows, thresholds);
    report.catalog.label = Some(label.to_string());
    info!(
        catalog = label,
        rows = report.total_rows,
        malformed = report.malformed.len(),
        rejected = report.rejected_quality,
        kept = report.kept(),
        "Catalog prepared"
    );
    report
}

/// Restrict each catalog to the part of the sky the other plate covers.
///
/// Catalog 1 is projected with plate 1's WCS and tested against plate 2,
/// and the other way round, so that a source missing from the other plate
/// is never just a source outside its field.
pub fn restrict_to_overlap(
    catalog1: &Catalog,
    catalog2: &Catalog,
    footprint: &FootprintConfig,
) -> Result<(Catalog, Catalog)> {
    let wcs1 = footprint.plate1.wcs()?;
    let wcs2 = footprint.plate2.wcs()?;

    let (shape1, shape2) = (footprint.plate1.shape(), footprint.plate2.shape());

    let kept1 = remove_outsiders(catalog1, &wcs2, &shape2, Some(&wcs1 as &dyn Wcs));
    let kept2 = remove_outsiders(catalog2, &wcs1, &shape1, Some(&wcs2 as &dyn Wcs));
    info!(
        catalog1 = kept1.len(),
        catalog2 = kept2.len(),
        "Catalogs restricted to common footprint"
    );
    Ok((kept1, kept2))
}

/// Restrict a catalog to its own plate's footprint.
pub fn restrict_to_plate(catalog: &Catalog, plate: &PlateGeometry) -> Result<Catalog> {
    let wcs = plate.wcs()?;
    Ok(remove_outsiders(catalog, &wcs, &plate.shape(), None))
}
