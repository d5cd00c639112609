#![allow(dead_code)]

use platematch_core::catalog::{Catalog, DetectionRecord, PixelCoord, RawDetection, SkyCoord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A well-fitted detection at the given sky position.
pub fn detection(id: &str, ra: f64, dec: f64) -> DetectionRecord {
    DetectionRecord {
        source_id: id.to_string(),
        pixel: PixelCoord::new(0.0, 0.0),
        sky: SkyCoord::new(ra, dec),
        flux: 20_000.0,
        fwhm: 6.0,
        qfit: 0.5,
        cfit: 0.1,
        flags: 0,
    }
}

/// Catalog from `(ra, dec)` pairs, ids `"{prefix}{index}"`.
pub fn catalog_from(prefix: &str, coords: &[(f64, f64)]) -> Catalog {
    let records = coords
        .iter()
        .enumerate()
        .map(|(i, &(ra, dec))| detection(&format!("{prefix}{i}"), ra, dec))
        .collect();
    Catalog::new(records).with_label(prefix)
}

/// Seeded catalog packed densely enough that a few-arcsecond box finds
/// both hits and misses.
pub fn random_catalog(prefix: &str, len: usize, seed: u64) -> Catalog {
    let mut rng = StdRng::seed_from_u64(seed);
    let coords: Vec<(f64, f64)> = (0..len)
        .map(|_| {
            (
                rng.random_range(150.0..150.05),
                rng.random_range(-20.05..-20.0),
            )
        })
        .collect();
    catalog_from(prefix, &coords)
}

/// Raw row with every field present.
pub fn raw_row(id: &str, ra: f64, dec: f64, qfit: f64, cfit: f64, flags: u32) -> RawDetection {
    RawDetection {
        source_id: Some(id.to_string()),
        x_source: Some(100.0),
        y_source: Some(200.0),
        ra_icrs: Some(ra),
        dec_icrs: Some(dec),
        flux: Some(15_000.0),
        fwhm_fit: Some(7.0),
        qfit: Some(qfit),
        cfit: Some(cfit),
        flags: Some(flags),
    }
}
