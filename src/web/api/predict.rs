use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::analysis::TrajectoryRow;
use crate::config::parse_duration;
use crate::predict::{forecast, Forecast};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictRequest {
    /// Trajectory history in kilometers.
    pub rows: Vec<TrajectoryRow>,
    /// How far past the last row to predict, e.g. `7days`.
    #[serde(default)]
    pub horizon: Option<String>,
    /// Spacing of predicted points, e.g. `1h`.
    #[serde(default)]
    pub interval: Option<String>,
    /// Also return this many spline-resampled points spanning the forecast.
    #[serde(default)]
    pub smooth_points: Option<usize>,
}

#[utoipa::path(
    post,
    path = "/api/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "History followed by predicted points", body = Forecast),
        (status = 400, description = "Insufficient history or invalid durations", body = ErrorResponse)
    ),
    tag = "predict"
)]
pub async fn predict_trajectory(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<Json<Forecast>> {
    let defaults = &state.config.prediction;
    let horizon = match request.horizon.as_deref() {
        Some(s) => parse_duration(s).map_err(|e| ApiError::Validation(format!("horizon: {e}")))?,
        None => defaults.horizon,
    };
    let interval = match request.interval.as_deref() {
        Some(s) => {
            parse_duration(s).map_err(|e| ApiError::Validation(format!("interval: {e}")))?
        }
        None => defaults.interval,
    };

    let mut result = forecast(&request.rows, horizon, interval)?;
    if let Some(samples) = request.smooth_points {
        result = result.with_smooth(samples);
    }
    Ok(Json(result))
}
