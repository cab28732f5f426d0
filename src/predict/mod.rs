mod error;
mod forecast;
mod model;
mod smooth;
mod types;

pub use error::PredictError;
pub use forecast::{forecast, predict, prediction_span, MAX_PREDICTION_STEPS};
pub use model::{can_predict, LinearFit, PredictorState, TrajectoryModel, MIN_HISTORY};
pub use smooth::{smooth_trajectory, CubicSpline, MAX_SMOOTH_SAMPLES};
pub use types::{Confidence, Forecast, PredictedPoint, PredictionSpan};
