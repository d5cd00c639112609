pub mod config;
pub mod cross;
pub mod duplicates;
pub mod filter;

mod shared;
