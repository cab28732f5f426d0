use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("unknown length unit: {0}")]
    UnknownUnit(String),
    #[error("z-score threshold must be a non-negative number, got {0}")]
    InvalidThreshold(f64),
}
