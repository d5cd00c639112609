mod common;

use platematch_core::catalog::{Catalog, PixelCoord, SkyCoord};
use platematch_core::config::{FootprintConfig, PlateGeometry};
use platematch_core::footprint::{cutout_region, remove_outsiders};
use platematch_core::matching::{CrossMatchEngine, NoOpObserver};
use platematch_core::pipeline::{restrict_to_overlap, restrict_to_plate};
use platematch_core::wcs::{contained_by, ImageShape, TanWcs, Wcs};

use common::detection;

const SCALE: f64 = 1.0 / 3600.0;

fn plate(ra: f64, dec: f64) -> PlateGeometry {
    PlateGeometry {
        crval: [ra, dec],
        crpix: [49.5, 49.5],
        cd: [[-SCALE, 0.0], [0.0, SCALE]],
        width: 100,
        height: 100,
    }
}

fn at_pixels(pixels: &[(f64, f64)]) -> Catalog {
    let records = pixels
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            let mut r = detection(&format!("p{i}"), 0.0, 0.0);
            r.pixel = PixelCoord::new(x, y);
            r
        })
        .collect();
    Catalog::new(records)
}

#[test]
fn test_contained_by_mask() {
    let wcs = TanWcs::with_scale([30.0, 10.0], [49.5, 49.5], SCALE).unwrap();
    let shape = ImageShape::new(100, 100);
    let coords = [
        SkyCoord::new(30.0, 10.0),
        SkyCoord::new(30.0, 10.0 + 60.0 * SCALE),
        wcs.pixel_to_world(PixelCoord::new(99.4, 0.0)).unwrap(),
        wcs.pixel_to_world(PixelCoord::new(99.6, 0.0)).unwrap(),
        SkyCoord::new(210.0, -10.0),
    ];
    assert_eq!(
        contained_by(&coords, &wcs, &shape),
        vec![true, false, true, false, false]
    );
}

#[test]
fn test_single_wcs_keeps_own_pixels() {
    let g = plate(30.0, 10.0);
    let wcs = g.wcs().unwrap();
    let catalog = at_pixels(&[(0.0, 0.0), (50.0, 50.0), (99.0, 99.0), (-3.0, 10.0), (120.0, 4.0)]);

    let kept = remove_outsiders(&catalog, &wcs, &g.shape(), None);
    let ids: Vec<&str> = kept.iter().map(|r| r.source_id.as_str()).collect();
    assert_eq!(ids, vec!["p0", "p1", "p2"]);
}

#[test]
fn test_kept_records_are_unchanged_subsequence() {
    let g = plate(30.0, 10.0);
    let wcs = g.wcs().unwrap();
    let mut catalog = at_pixels(&[(120.0, 4.0), (10.0, 20.0), (-3.0, 10.0), (60.0, 70.0), (99.0, 0.0)]);
    // Catalog coordinates that differ from what the plate WCS would give.
    for (i, r) in catalog.records.iter_mut().enumerate() {
        r.sky = SkyCoord::new(31.0 + i as f64 * 0.01, 11.0);
    }

    let kept = remove_outsiders(&catalog, &wcs, &g.shape(), None);
    let expected: Vec<_> = [1, 3, 4].iter().map(|&i| catalog[i].clone()).collect();
    assert_eq!(kept.records, expected);
}

#[test]
fn test_matching_after_footprint_uses_catalog_coordinates() {
    let g = plate(30.0, 10.0);
    let wcs = g.wcs().unwrap();
    // The record sits at the reference pixel but its catalog RA is 2" east
    // of the reference value.
    let mut record = detection("s0", 30.0 + 2.0 * SCALE, 10.0);
    record.pixel = PixelCoord::new(49.5, 49.5);
    let catalog = Catalog::new(vec![record.clone()]);
    let partner = Catalog::new(vec![detection("t0", 30.0 + 2.0 * SCALE, 10.0)]);

    let kept = remove_outsiders(&catalog, &wcs, &g.shape(), None);
    assert_eq!(kept[0], record);

    let engine = CrossMatchEngine::cross_catalog(&kept, &partner, 0.5 * SCALE).unwrap();
    assert_eq!(engine.run_all(&NoOpObserver).unwrap(), vec![0]);
}

#[test]
fn test_catalog_and_image_wcs_are_kept_apart() {
    // Plate 2 is shifted 60 pixels north of plate 1.
    let g1 = plate(30.0, 10.0);
    let g2 = plate(30.0, 10.0 + 60.0 * SCALE);
    let (wcs1, wcs2) = (g1.wcs().unwrap(), g2.wcs().unwrap());
    let catalog = at_pixels(&[(50.0, 5.0), (50.0, 80.0)]);

    // Projected with plate 1, tested on plate 2: only the northern source overlaps.
    let two_wcs = remove_outsiders(&catalog, &wcs2, &g2.shape(), Some(&wcs1 as &dyn Wcs));
    let ids: Vec<&str> = two_wcs.iter().map(|r| r.source_id.as_str()).collect();
    assert_eq!(ids, vec!["p1"]);

    // Collapsing to a single WCS keeps both and would be wrong here.
    let one_wcs = remove_outsiders(&catalog, &wcs2, &g2.shape(), None);
    assert_eq!(one_wcs.len(), 2);
}

#[test]
fn test_restrict_to_overlap_both_directions() {
    let footprint = FootprintConfig {
        plate1: plate(30.0, 10.0),
        plate2: plate(30.0, 10.0 + 60.0 * SCALE),
    };
    let c1 = at_pixels(&[(50.0, 5.0), (50.0, 80.0)]);
    let c2 = at_pixels(&[(50.0, 5.0), (50.0, 80.0)]);

    let (k1, k2) = restrict_to_overlap(&c1, &c2, &footprint).unwrap();
    assert_eq!(k1.len(), 1);
    assert_eq!(k1[0].source_id, "p1");
    // Plate 2's southern source lies on plate 1.
    assert_eq!(k2.len(), 1);
    assert_eq!(k2[0].source_id, "p0");
}

#[test]
fn test_restrict_to_plate() {
    let g = plate(100.0, -40.0);
    let catalog = at_pixels(&[(10.0, 10.0), (100.0, 10.0)]);
    let kept = restrict_to_plate(&catalog, &g).unwrap();
    assert_eq!(kept.len(), 1);
}

#[test]
fn test_singular_plate_geometry_is_wcs_error() {
    let mut g = plate(0.0, 0.0);
    g.cd = [[0.0, 0.0], [0.0, 0.0]];
    assert!(restrict_to_plate(&at_pixels(&[(1.0, 1.0)]), &g).is_err());
}

#[test]
fn test_cutout_inside_image() {
    let wcs = TanWcs::with_scale([30.0, 10.0], [49.5, 49.5], SCALE).unwrap();
    let shape = ImageShape::new(100, 100);
    let center = wcs.pixel_to_world(PixelCoord::new(50.0, 50.0)).unwrap();

    let rect = cutout_region(&wcs, &shape, center, 20.0 * SCALE).unwrap();
    assert_eq!((rect.x, rect.y), (40, 40));
    assert_eq!((rect.width, rect.height), (21, 21));
}

#[test]
fn test_cutout_clipped_at_edge() {
    let wcs = TanWcs::with_scale([30.0, 10.0], [49.5, 49.5], SCALE).unwrap();
    let shape = ImageShape::new(100, 100);
    let center = wcs.pixel_to_world(PixelCoord::new(95.0, 2.0)).unwrap();

    let rect = cutout_region(&wcs, &shape, center, 20.0 * SCALE).unwrap();
    assert_eq!(rect.x + rect.width, 100);
    assert_eq!(rect.y, 0);
}

#[test]
fn test_cutout_without_overlap_is_absent() {
    let wcs = TanWcs::with_scale([30.0, 10.0], [49.5, 49.5], SCALE).unwrap();
    let shape = ImageShape::new(100, 100);
    let far = wcs.pixel_to_world(PixelCoord::new(500.0, 50.0)).unwrap();

    assert!(cutout_region(&wcs, &shape, far, 20.0 * SCALE).is_none());
    assert!(cutout_region(&wcs, &shape, SkyCoord::new(210.0, -10.0), 0.1).is_none());
}
