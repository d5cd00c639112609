pub mod catalog_csv;

pub use catalog_csv::{
    read_raw_detections, read_raw_detections_from, write_catalog, write_catalog_to,
};
