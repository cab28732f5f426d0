use utoipa::OpenApi;

use super::api::analysis::{AnomaliesRequest, DescribeRequest, MetricsRequest, MetricsResponse};
use super::api::error::ErrorResponse;
use super::api::predict::PredictRequest;
use super::api::trajectory::TrajectoryRequest;
use crate::analysis::{
    Anomaly, AnomalyReport, Column, ColumnStats, LengthUnit, OrbitSummary, TrajectoryMetrics,
    TrajectoryRow,
};
use crate::predict::{Confidence, Forecast, PredictedPoint, PredictionSpan};
use crate::propagate::{Frame, StateVector};
use crate::sampler::TrajectorySeries;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::trajectory::sample_trajectory,
        super::api::analysis::metrics,
        super::api::analysis::anomalies,
        super::api::analysis::describe_columns,
        super::api::predict::predict_trajectory,
    ),
    components(
        schemas(
            TrajectoryRequest,
            TrajectorySeries,
            StateVector,
            Frame,
            MetricsRequest,
            MetricsResponse,
            AnomaliesRequest,
            DescribeRequest,
            TrajectoryRow,
            TrajectoryMetrics,
            OrbitSummary,
            Anomaly,
            AnomalyReport,
            Column,
            ColumnStats,
            LengthUnit,
            PredictRequest,
            Forecast,
            PredictedPoint,
            PredictionSpan,
            Confidence,
            ErrorResponse,
        )
    ),
    info(
        title = "Orbitdash API",
        description = "Orbit propagation, trajectory sampling and trajectory analysis",
        version = "0.1.0"
    ),
    tags(
        (name = "trajectory", description = "Element set propagation and sampling"),
        (name = "analysis", description = "Metrics, anomalies and statistics over trajectory tables"),
        (name = "predict", description = "Regression-based trajectory prediction")
    )
)]
pub struct ApiDoc;
