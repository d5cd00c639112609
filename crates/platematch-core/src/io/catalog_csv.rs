use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::catalog::{Catalog, RawDetection};
use crate::error::Result;

/// Read extraction-table rows from a CSV file with a header line.
///
/// Rows may be short or contain unparsable values; those fields come back as
/// `None` and are reported when the rows are converted into records. Extra
/// columns are ignored.
pub fn read_raw_detections(path: &Path) -> Result<Vec<RawDetection>> {
    let file = std::fs::File::open(path)?;
    let rows = read_raw_detections_from(file)?;
    info!(path = %path.display(), rows = rows.len(), "Read detection table");
    Ok(rows)
}

pub fn read_raw_detections_from<R: Read>(reader: R) -> Result<Vec<RawDetection>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write a catalog with the same column layout it is read with.
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_catalog_to(file, catalog)?;
    info!(path = %path.display(), rows = catalog.len(), "Wrote detection table");
    Ok(())
}

pub fn write_catalog_to<W: Write>(writer: W, catalog: &Catalog) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in catalog.iter() {
        wtr.serialize(RawDetection::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}
