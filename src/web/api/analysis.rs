use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::analysis::{
    describe, detect_anomalies, orbit_summary, trajectory_metrics, AnomalyReport, Column,
    ColumnStats, LengthUnit, OrbitSummary, TrajectoryMetrics, TrajectoryRow,
};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct MetricsRequest {
    pub rows: Vec<TrajectoryRow>,
    /// Unit of the position and altitude columns; the configured unit when absent.
    #[serde(default)]
    pub units: Option<LengthUnit>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsResponse {
    pub metrics: TrajectoryMetrics,
    pub orbit: Option<OrbitSummary>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnomaliesRequest {
    pub rows: Vec<TrajectoryRow>,
    pub column: Column,
    #[serde(default)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DescribeRequest {
    pub rows: Vec<TrajectoryRow>,
}

#[utoipa::path(
    post,
    path = "/api/analysis/metrics",
    request_body = MetricsRequest,
    responses(
        (status = 200, description = "Trajectory metrics", body = MetricsResponse)
    ),
    tag = "analysis"
)]
pub async fn metrics(
    State(state): State<AppState>,
    Json(request): Json<MetricsRequest>,
) -> Json<MetricsResponse> {
    let units = request.units.unwrap_or(state.config.analysis.units);
    Json(MetricsResponse {
        metrics: trajectory_metrics(&request.rows, units),
        orbit: orbit_summary(&request.rows, units),
    })
}

#[utoipa::path(
    post,
    path = "/api/analysis/anomalies",
    request_body = AnomaliesRequest,
    responses(
        (status = 200, description = "Rows whose z-score exceeds the threshold", body = AnomalyReport),
        (status = 400, description = "Invalid threshold", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn anomalies(
    State(state): State<AppState>,
    Json(request): Json<AnomaliesRequest>,
) -> ApiResult<Json<AnomalyReport>> {
    let threshold = request
        .threshold
        .unwrap_or(state.config.analysis.z_threshold);
    let report = detect_anomalies(&request.rows, request.column, threshold)?;
    Ok(Json(report))
}

#[utoipa::path(
    post,
    path = "/api/analysis/describe",
    request_body = DescribeRequest,
    responses(
        (status = 200, description = "Per-column descriptive statistics", body = Vec<ColumnStats>)
    ),
    tag = "analysis"
)]
pub async fn describe_columns(Json(request): Json<DescribeRequest>) -> Json<Vec<ColumnStats>> {
    Json(describe(&request.rows))
}
