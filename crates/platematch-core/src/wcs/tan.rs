use crate::catalog::{PixelCoord, SkyCoord};
use crate::error::{PlatematchError, Result};

use super::Wcs;

const DETERMINANT_THRESHOLD: f64 = 1e-15;

/// Gnomonic (TAN) projection with a CD matrix.
///
/// `crpix` is zero-based, in the same frame as [`PixelCoord`]. Intermediate
/// coordinates are `cd * (pixel - crpix)` in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct TanWcs {
    crval: [f64; 2],
    crpix: [f64; 2],
    cd: [[f64; 2]; 2],
    cd_inverse: [[f64; 2]; 2],
}

impl TanWcs {
    pub fn new(crval: [f64; 2], crpix: [f64; 2], cd: [[f64; 2]; 2]) -> Result<Self> {
        let determinant = cd[0][0] * cd[1][1] - cd[0][1] * cd[1][0];
        if !determinant.is_finite() || determinant.abs() < DETERMINANT_THRESHOLD {
            return Err(PlatematchError::Wcs(format!(
                "CD matrix is not invertible (determinant = {determinant})"
            )));
        }
        if !(-90.0..=90.0).contains(&crval[1]) {
            return Err(PlatematchError::Wcs(format!(
                "reference declination {} outside [-90, 90]",
                crval[1]
            )));
        }
        let inv_det = 1.0 / determinant;
        let cd_inverse = [
            [cd[1][1] * inv_det, -cd[0][1] * inv_det],
            [-cd[1][0] * inv_det, cd[0][0] * inv_det],
        ];
        Ok(Self {
            crval,
            crpix,
            cd,
            cd_inverse,
        })
    }

    /// Axis-aligned WCS with a uniform scale in degrees per pixel. Right
    /// ascension increases towards negative x, as on the sky.
    pub fn with_scale(crval: [f64; 2], crpix: [f64; 2], deg_per_pixel: f64) -> Result<Self> {
        Self::new(crval, crpix, [[-deg_per_pixel, 0.0], [0.0, deg_per_pixel]])
    }

    pub fn crval(&self) -> [f64; 2] {
        self.crval
    }

    pub fn crpix(&self) -> [f64; 2] {
        self.crpix
    }

    pub fn cd_matrix(&self) -> [[f64; 2]; 2] {
        self.cd
    }
}

impl Wcs for TanWcs {
    fn pixel_to_world(&self, pixel: PixelCoord) -> Option<SkyCoord> {
        let d0 = pixel.x - self.crpix[0];
        let d1 = pixel.y - self.crpix[1];
        let xi = (self.cd[0][0] * d0 + self.cd[0][1] * d1).to_radians();
        let eta = (self.cd[1][0] * d0 + self.cd[1][1] * d1).to_radians();
        if !(xi.is_finite() && eta.is_finite()) {
            return None;
        }

        let ra0 = self.crval[0].to_radians();
        let (sin_d0, cos_d0) = self.crval[1].to_radians().sin_cos();

        let rho = xi.hypot(eta);
        if rho == 0.0 {
            return Some(SkyCoord::new(self.crval[0].rem_euclid(360.0), self.crval[1]));
        }
        let c = rho.atan();
        let (sin_c, cos_c) = c.sin_cos();

        let dec = (cos_c * sin_d0 + eta * sin_c * cos_d0 / rho).clamp(-1.0, 1.0).asin();
        let ra = ra0 + (xi * sin_c).atan2(rho * cos_d0 * cos_c - eta * sin_d0 * sin_c);

        Some(SkyCoord::new(
            ra.to_degrees().rem_euclid(360.0),
            dec.to_degrees(),
        ))
    }

    fn world_to_pixel(&self, sky: SkyCoord) -> Option<PixelCoord> {
        let (sin_d0, cos_d0) = self.crval[1].to_radians().sin_cos();
        let (sin_d, cos_d) = sky.dec.to_radians().sin_cos();
        let (sin_da, cos_da) = (sky.ra - self.crval[0]).to_radians().sin_cos();

        let cos_c = sin_d0 * sin_d + cos_d0 * cos_d * cos_da;
        // Points 90 degrees or more from the tangent point do not project.
        if cos_c.is_nan() || cos_c <= 0.0 {
            return None;
        }

        let xi = (cos_d * sin_da / cos_c).to_degrees();
        let eta = ((cos_d0 * sin_d - sin_d0 * cos_d * cos_da) / cos_c).to_degrees();

        let x = self.cd_inverse[0][0] * xi + self.cd_inverse[0][1] * eta + self.crpix[0];
        let y = self.cd_inverse[1][0] * xi + self.cd_inverse[1][1] * eta + self.crpix[1];
        Some(PixelCoord::new(x, y))
    }
}
