use thiserror::Error;

use crate::elements::ElementError;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("step must be a positive number of minutes, got {0}")]
    InvalidStep(f64),
    #[error("window needs {requested} steps, more than the limit of {limit}")]
    TooManySteps { requested: i64, limit: i64 },
    #[error(transparent)]
    Elements(#[from] ElementError),
}
