use tracing::{debug, warn};

use crate::catalog::{Catalog, PixelCoord, SkyCoord};
use crate::wcs::{contained_by, project, ImageShape, Wcs};

/// Keep the detections whose pixel position, projected to the sky, falls
/// inside `image`'s footprint.
///
/// There are generally two WCS instances: `catalog_wcs` converts the
/// catalog's own pixel positions to the sky, `image_wcs` decides containment
/// in the target image. When `catalog_wcs` is `None` both roles use
/// `image_wcs`.
///
/// The result is the ordered subsequence of the kept records, unchanged. The
/// projection only decides containment. Records whose pixel position cannot
/// be projected are dropped.
pub fn remove_outsiders(
    catalog: &Catalog,
    image_wcs: &dyn Wcs,
    image: &ImageShape,
    catalog_wcs: Option<&dyn Wcs>,
) -> Catalog {
    let projector = catalog_wcs.unwrap_or(image_wcs);

    let pixels: Vec<PixelCoord> = catalog.iter().map(|r| r.pixel).collect();
    let projected: Vec<(usize, SkyCoord)> = project(projector, &pixels)
        .into_iter()
        .enumerate()
        .filter_map(|(i, sky)| sky.map(|sky| (i, sky)))
        .collect();
    let coords: Vec<SkyCoord> = projected.iter().map(|(_, sky)| *sky).collect();
    let mask = contained_by(&coords, image_wcs, image);

    let records = projected
        .iter()
        .zip(mask)
        .filter(|(_, inside)| *inside)
        .map(|((i, _), _)| catalog[*i].clone())
        .collect();

    let kept = Catalog {
        label: catalog.label.clone(),
        records,
    };
    debug!(
        catalog = catalog.name(),
        before = catalog.len(),
        after = kept.len(),
        unprojectable = catalog.len() - projected.len(),
        "Footprint filter applied"
    );
    kept
}

/// A rectangle in image pixel indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Local pixel scale around `pixel`, in degrees per pixel.
///
/// Estimated from the sky offsets of the neighbouring pixels along each
/// axis, with right ascension scaled by cos(dec).
fn pixel_scale_at(wcs: &dyn Wcs, pixel: PixelCoord) -> Option<f64> {
    let centre = wcs.pixel_to_world(pixel)?;
    let step_x = wcs.pixel_to_world(PixelCoord::new(pixel.x + 1.0, pixel.y))?;
    let step_y = wcs.pixel_to_world(PixelCoord::new(pixel.x, pixel.y + 1.0))?;
    let cos_dec = centre.dec.to_radians().cos();

    let offset = |other: SkyCoord| {
        let mut dra = other.ra - centre.ra;
        if dra > 180.0 {
            dra -= 360.0;
        } else if dra < -180.0 {
            dra += 360.0;
        }
        (dra * cos_dec).hypot(other.dec - centre.dec)
    };

    let scale = (offset(step_x) * offset(step_y)).sqrt();
    (scale.is_finite() && scale > 0.0).then_some(scale)
}

/// Pixel region of a square cutout of `size_deg` centred on `center`,
/// clipped to the image.
///
/// Returns `None` when the cutout does not overlap the image at all. That is
/// not an error: the region is simply absent for this image.
pub fn cutout_region(
    wcs: &dyn Wcs,
    image: &ImageShape,
    center: SkyCoord,
    size_deg: f64,
) -> Option<PixelRect> {
    let Some(centre_px) = wcs.world_to_pixel(center) else {
        warn!(ra = center.ra, dec = center.dec, "Cutout centre does not project onto image");
        return None;
    };
    let scale = pixel_scale_at(wcs, centre_px)?;
    let half = 0.5 * size_deg / scale;

    let clip = |lo: f64, hi: f64, extent: u32| -> Option<(u32, u32)> {
        let first = (lo + 0.5).floor().max(0.0);
        let end = (hi + 0.5).ceil().min(extent as f64);
        (end > first).then(|| (first as u32, (end - first) as u32))
    };

    let region = clip(centre_px.x - half, centre_px.x + half, image.width).and_then(|(x, w)| {
        clip(centre_px.y - half, centre_px.y + half, image.height).map(|(y, h)| PixelRect {
            x,
            y,
            width: w,
            height: h,
        })
    });

    if region.is_none() {
        warn!(
            ra = center.ra,
            dec = center.dec,
            size_deg,
            "Cutout does not overlap image"
        );
    }
    region
}
