use chrono::{DateTime, Duration, Utc};
use log::info;

use super::error::PredictError;
use super::model::TrajectoryModel;
use super::types::{Confidence, Forecast, PredictedPoint, PredictionSpan};
use crate::analysis::{sorted_by_time, TrajectoryRow};

pub const MAX_PREDICTION_STEPS: i64 = 100_000;

/// Step the model forward from its last observed state, one point per
/// `interval`, producing `horizon / interval + 1` points.
pub fn predict(
    model: &TrajectoryModel,
    horizon: Duration,
    interval: Duration,
) -> Result<Vec<PredictedPoint>, PredictError> {
    // Steps are counted in whole milliseconds.
    if interval < Duration::milliseconds(1) {
        return Err(PredictError::InvalidInterval(format_duration(interval)));
    }
    if horizon < Duration::zero() {
        return Err(PredictError::InvalidHorizon(format_duration(horizon)));
    }

    let steps = horizon.num_milliseconds() / interval.num_milliseconds() + 1;
    if steps > MAX_PREDICTION_STEPS {
        return Err(PredictError::TooManySteps(steps));
    }

    let dt = interval.num_milliseconds() as f64 / 1000.0;
    let mut state = model.last_state();
    let mut points = Vec::with_capacity(steps as usize);
    for _ in 0..steps {
        state = model.advance(state, dt);
        let timestamp = offset(model.origin(), state.elapsed_s)
            .ok_or_else(|| PredictError::InvalidHorizon(format_duration(horizon)))?;
        points.push(PredictedPoint {
            timestamp,
            x: state.position[0],
            y: state.position[1],
            z: state.position[2],
            vx: state.velocity[0],
            vy: state.velocity[1],
            vz: state.velocity[2],
            predicted: true,
        });
    }
    Ok(points)
}

/// Distance between the first and last points and the time between them.
pub fn prediction_span(points: &[PredictedPoint]) -> Option<PredictionSpan> {
    let (first, last) = (points.first()?, points.last()?);
    let (a, b) = (first.position(), last.position());
    Some(PredictionSpan {
        distance_km: ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2) + (b[2] - a[2]).powi(2))
            .sqrt(),
        timespan_hours: (last.timestamp - first.timestamp).num_milliseconds() as f64 / 3_600_000.0,
    })
}

/// Fit a model to `rows` and return the history joined with its predictions.
pub fn forecast(
    rows: &[TrajectoryRow],
    horizon: Duration,
    interval: Duration,
) -> Result<Forecast, PredictError> {
    let model = TrajectoryModel::fit(rows)?;
    let predicted = predict(&model, horizon, interval)?;
    let span = prediction_span(&predicted);
    let r_squared = model.r_squared();

    let mut points: Vec<PredictedPoint> = sorted_by_time(rows)
        .into_iter()
        .filter_map(|r| {
            let [x, y, z] = r.position()?;
            let [vx, vy, vz] = r.velocity().unwrap_or_default();
            Some(PredictedPoint {
                timestamp: r.timestamp?,
                x,
                y,
                z,
                vx,
                vy,
                vz,
                predicted: false,
            })
        })
        .collect();
    let history = points.len();
    points.extend(predicted);

    info!(
        "Predicted {} points from {} history rows (R² {:.3})",
        points.len() - history,
        history,
        r_squared
    );

    Ok(Forecast {
        points,
        r_squared,
        confidence: Confidence::from_r_squared(r_squared),
        span,
        smooth: Vec::new(),
    })
}

fn offset(origin: DateTime<Utc>, elapsed_s: f64) -> Option<DateTime<Utc>> {
    let millis = (elapsed_s * 1000.0).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    origin.checked_add_signed(Duration::milliseconds(millis as i64))
}

fn format_duration(d: Duration) -> String {
    match d.to_std() {
        Ok(std) => humantime::format_duration(std).to_string(),
        Err(_) => d.to_string(),
    }
}
