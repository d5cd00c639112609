/// Arcseconds per degree.
pub const ARCSEC_PER_DEG: f64 = 3600.0;

/// Default half-width of the matching box, in degrees (5 arcsec).
pub const DEFAULT_TOLERANCE_DEG: f64 = 5.0 / ARCSEC_PER_DEG;

/// Default flag mask. Every bit set means the flag word must be zero.
pub const DEFAULT_FLAG_MASK: u32 = u32::MAX;

/// Default upper bound (exclusive) on the Gaussian quality-of-fit value.
/// Zero means a perfectly fitted Gaussian.
pub const DEFAULT_QFIT_MAX: f64 = 5.0;

/// Default bound on the absolute sharpness (central-pixel fit) value.
pub const DEFAULT_CFIT_MAX: f64 = 5.0;

/// Default number of matching workers.
pub const DEFAULT_WORKER_COUNT: usize = 8;

/// Outer-loop stride between sampled progress events.
pub const PROGRESS_SAMPLE_INTERVAL: usize = 500;

/// Pixel-centre offset used for footprint containment: pixel `i` covers
/// `[i - 0.5, i + 0.5)`.
pub const PIXEL_EDGE_OFFSET: f64 = 0.5;
