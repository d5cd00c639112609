use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatematchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed detection at row {row}: {message}")]
    Data { row: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Outer range {start}..{end} exceeds catalog length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    #[error("WCS error: {0}")]
    Wcs(String),

    #[error("Worker {worker} failed: {message}")]
    Worker { worker: usize, message: String },
}

impl PlatematchError {
    /// True for the configuration family of errors, which are raised before
    /// any scanning begins.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::RangeOutOfBounds { .. })
    }
}

pub type Result<T> = std::result::Result<T, PlatematchError>;
