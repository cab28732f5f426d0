mod error;
mod sampler;
mod series;

pub use error::SampleError;
pub use sampler::{
    sample_records, sample_series, sample_with, step_timestamps, SampleOptions,
    DEFAULT_STALE_AFTER_DAYS, DEFAULT_STEP_MINUTES, MAX_SAMPLE_STEPS,
};
pub use series::TrajectorySeries;
