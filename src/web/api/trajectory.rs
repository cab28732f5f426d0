use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::propagate::Frame;
use crate::sampler::{sample_records, TrajectorySeries};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrajectoryRequest {
    /// Upstream element records, most recent first.
    #[schema(value_type = Vec<Object>)]
    pub records: Vec<Value>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub step_minutes: Option<f64>,
    #[serde(default)]
    pub frame: Option<Frame>,
    #[serde(default)]
    pub parallel: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/trajectory",
    request_body = TrajectoryRequest,
    responses(
        (status = 200, description = "Sampled trajectory, possibly empty", body = TrajectorySeries),
        (status = 400, description = "Invalid elements or step", body = ErrorResponse)
    ),
    tag = "trajectory"
)]
pub async fn sample_trajectory(
    State(state): State<AppState>,
    Json(request): Json<TrajectoryRequest>,
) -> ApiResult<Json<TrajectorySeries>> {
    let mut options = state.config.sampling.options();
    if let Some(step) = request.step_minutes {
        options.step_minutes = step;
    }
    if let Some(frame) = request.frame {
        options.frame = frame;
    }
    if let Some(parallel) = request.parallel {
        options.parallel = parallel;
    }

    let TrajectoryRequest {
        records, start, end, ..
    } = request;
    let series =
        tokio::task::spawn_blocking(move || sample_records(&records, start, end, &options))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::response::IntoResponse;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn request(records: Vec<Value>, step_minutes: Option<f64>) -> TrajectoryRequest {
        let start = Utc.with_ymd_and_hms(2020, 5, 27, 6, 0, 0).unwrap();
        TrajectoryRequest {
            records,
            start,
            end: start + Duration::minutes(30),
            step_minutes,
            frame: None,
            parallel: Some(true),
        }
    }

    fn iss() -> Value {
        json!({
            "OBJECT_NAME": "ISS (ZARYA)",
            "NORAD_CAT_ID": "25544",
            "TLE_LINE1": "1 25544U 98067A   20148.21301450  .00001715  00000-0  38778-4 0  9992",
            "TLE_LINE2": "2 25544  51.6435  92.2789 0002570 358.0648 144.9972 15.49396855228767",
        })
    }

    #[tokio::test]
    async fn samples_with_configured_defaults() {
        let state = AppState::new(Config::default());
        let Json(series) = sample_trajectory(State(state), Json(request(vec![iss()], None)))
            .await
            .unwrap();
        assert_eq!(series.len(), 7);
        assert_eq!(series.norad_id, Some(25544));
    }

    #[tokio::test]
    async fn empty_records_are_an_empty_series() {
        let state = AppState::new(Config::default());
        let Json(series) = sample_trajectory(State(state), Json(request(vec![], Some(1.0))))
            .await
            .unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn record_without_lines_is_a_bad_request() {
        let state = AppState::new(Config::default());
        let err = sample_trajectory(
            State(state),
            Json(request(vec![json!({"OBJECT_NAME": "X"})], None)),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Elements(crate::elements::ElementError::MissingElementData(_))
        ));
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn oversized_window_is_a_bad_request() {
        let state = AppState::new(Config::default());
        let mut body = request(vec![iss()], Some(0.0001));
        body.end = body.start + Duration::days(3650);
        let err = sample_trajectory(State(state), Json(body))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Sampling(crate::sampler::SampleError::TooManySteps { .. })
        ));
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::BAD_REQUEST
        );
    }
}
