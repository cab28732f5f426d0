use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("No trajectory data")]
    NoData,
    #[error("Missing position data (x, y, z)")]
    MissingPositions,
    #[error("Missing timestamps")]
    MissingTimestamps,
    #[error("Insufficient history: {found} usable rows, need at least {required}")]
    InsufficientHistory { found: usize, required: usize },
    #[error("Prediction interval must be at least 1ms: {0}")]
    InvalidInterval(String),
    #[error("Prediction horizon must not be negative: {0}")]
    InvalidHorizon(String),
    #[error("Prediction would produce {0} points")]
    TooManySteps(i64),
}
