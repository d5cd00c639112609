pub mod catalog;
pub mod config;
pub mod consts;
pub mod error;
pub mod footprint;
pub mod io;
pub mod matching;
pub mod pipeline;
pub mod quality;
pub mod wcs;
