pub mod filter;
pub mod thresholds;

pub use filter::{filter_catalog, filter_raw, passes, FilterReport};
pub use thresholds::QualityThresholds;
