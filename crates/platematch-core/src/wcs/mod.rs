pub mod tan;

use serde::{Deserialize, Serialize};

use crate::catalog::{PixelCoord, SkyCoord};
use crate::consts::PIXEL_EDGE_OFFSET;

pub use tan::TanWcs;

/// Mapping between an image's pixel grid and the sky.
///
/// Implementations return `None` where the mapping is undefined, e.g. a sky
/// position on the far side of a zenithal projection.
pub trait Wcs: Send + Sync {
    fn pixel_to_world(&self, pixel: PixelCoord) -> Option<SkyCoord>;

    fn world_to_pixel(&self, sky: SkyCoord) -> Option<PixelCoord>;
}

/// Size of an image's valid pixel area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageShape {
    pub width: u32,
    pub height: u32,
}

impl ImageShape {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if a pixel position lies strictly inside the outer pixel edges.
    pub fn contains(&self, pixel: PixelCoord) -> bool {
        let x_max = self.width as f64 - PIXEL_EDGE_OFFSET;
        let y_max = self.height as f64 - PIXEL_EDGE_OFFSET;
        pixel.x > -PIXEL_EDGE_OFFSET
            && pixel.x < x_max
            && pixel.y > -PIXEL_EDGE_OFFSET
            && pixel.y < y_max
    }
}

/// Project pixel positions to the sky. Returns `None` for any pixel the WCS
/// cannot map.
pub fn project(wcs: &dyn Wcs, pixels: &[PixelCoord]) -> Vec<Option<SkyCoord>> {
    pixels.iter().map(|p| wcs.pixel_to_world(*p)).collect()
}

/// Mask of the sky coordinates that fall inside `image` under `wcs`.
pub fn contained_by(coords: &[SkyCoord], wcs: &dyn Wcs, image: &ImageShape) -> Vec<bool> {
    coords
        .iter()
        .map(|c| wcs.world_to_pixel(*c).is_some_and(|p| image.contains(p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges() {
        let shape = ImageShape::new(10, 20);
        assert!(shape.contains(PixelCoord::new(0.0, 0.0)));
        assert!(shape.contains(PixelCoord::new(9.49, 19.49)));
        assert!(!shape.contains(PixelCoord::new(-0.5, 3.0)));
        assert!(!shape.contains(PixelCoord::new(9.5, 3.0)));
        assert!(!shape.contains(PixelCoord::new(3.0, 19.5)));
    }
}
