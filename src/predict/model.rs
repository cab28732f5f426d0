use chrono::{DateTime, Utc};

use super::error::PredictError;
use crate::analysis::{sorted_by_time, TrajectoryRow};

/// Minimum number of rows with a timestamp and full position before a model
/// is fitted.
pub const MIN_HISTORY: usize = 10;

/// Check that `rows` carry enough history to fit a model.
pub fn can_predict(rows: &[TrajectoryRow]) -> Result<(), PredictError> {
    if rows.is_empty() {
        return Err(PredictError::NoData);
    }
    if rows.iter().all(|r| r.position().is_none()) {
        return Err(PredictError::MissingPositions);
    }
    if rows.iter().all(|r| r.timestamp.is_none()) {
        return Err(PredictError::MissingTimestamps);
    }

    let found = rows
        .iter()
        .filter(|r| r.timestamp.is_some() && r.position().is_some())
        .count();
    if found < MIN_HISTORY {
        return Err(PredictError::InsufficientHistory {
            found,
            required: MIN_HISTORY,
        });
    }
    Ok(())
}

/// Ordinary least squares line `y = slope * t + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn fit(t: &[f64], y: &[f64]) -> Self {
        let n = t.len().min(y.len()) as f64;
        let mean_t = t.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;

        let (sxx, sxy) = t
            .iter()
            .zip(y)
            .fold((0.0, 0.0), |(sxx, sxy), (ti, yi)| {
                (sxx + (ti - mean_t).powi(2), sxy + (ti - mean_t) * (yi - mean_y))
            });
        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        let intercept = mean_y - slope * mean_t;

        let ss_tot: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
        let ss_res: f64 = t
            .iter()
            .zip(y)
            .map(|(ti, yi)| (yi - (slope * ti + intercept)).powi(2))
            .sum();
        // A constant series is fitted exactly by its mean.
        let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

        LinearFit {
            slope,
            intercept,
            r_squared,
        }
    }

    pub fn at(&self, t: f64) -> f64 {
        self.slope * t + self.intercept
    }
}

/// State carried from one prediction step to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictorState {
    /// Seconds since the model origin.
    pub elapsed_s: f64,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub acceleration: [f64; 3],
}

/// Per-axis velocity-versus-time regression over a trajectory history.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryModel {
    origin: DateTime<Utc>,
    axes: [LinearFit; 3],
    last: PredictorState,
}

impl TrajectoryModel {
    /// Fit velocity lines to `rows`. Rows are ordered by timestamp first;
    /// velocities come from the `vx`, `vy`, `vz` columns when every usable row
    /// has them, otherwise from finite differences assigned to the later row.
    pub fn fit(rows: &[TrajectoryRow]) -> Result<Self, PredictError> {
        can_predict(rows)?;

        let history: Vec<(DateTime<Utc>, [f64; 3], Option<[f64; 3]>)> = sorted_by_time(rows)
            .into_iter()
            .filter_map(|r| Some((r.timestamp?, r.position()?, r.velocity())))
            .collect();
        let (origin, ..) = history[0];
        let elapsed = |at: DateTime<Utc>| (at - origin).num_milliseconds() as f64 / 1000.0;

        let samples: Vec<(f64, [f64; 3])> = if history.iter().all(|(.., v)| v.is_some()) {
            history
                .iter()
                .filter_map(|(at, _, v)| Some((elapsed(*at), (*v)?)))
                .collect()
        } else {
            history
                .windows(2)
                .filter_map(|pair| {
                    let (t0, p0, _) = pair[0];
                    let (t1, p1, _) = pair[1];
                    let dt = elapsed(t1) - elapsed(t0);
                    (dt > 0.0).then(|| {
                        (
                            elapsed(t1),
                            [
                                (p1[0] - p0[0]) / dt,
                                (p1[1] - p0[1]) / dt,
                                (p1[2] - p0[2]) / dt,
                            ],
                        )
                    })
                })
                .collect()
        };
        if samples.len() < 2 {
            return Err(PredictError::InsufficientHistory {
                found: samples.len(),
                required: MIN_HISTORY,
            });
        }

        let t: Vec<f64> = samples.iter().map(|(t, _)| *t).collect();
        let axis = |i: usize| {
            let v: Vec<f64> = samples.iter().map(|(_, v)| v[i]).collect();
            LinearFit::fit(&t, &v)
        };
        let axes = [axis(0), axis(1), axis(2)];

        let (last_at, last_position, _) = history[history.len() - 1];
        let (_, last_velocity) = samples[samples.len() - 1];

        Ok(TrajectoryModel {
            origin,
            axes,
            last: PredictorState {
                elapsed_s: elapsed(last_at),
                position: last_position,
                velocity: last_velocity,
                acceleration: axes.map(|a| a.slope),
            },
        })
    }

    pub fn origin(&self) -> DateTime<Utc> {
        self.origin
    }

    pub fn axes(&self) -> &[LinearFit; 3] {
        &self.axes
    }

    pub fn last_state(&self) -> PredictorState {
        self.last
    }

    /// Mean R² over the three axes.
    pub fn r_squared(&self) -> f64 {
        self.axes.iter().map(|a| a.r_squared).sum::<f64>() / 3.0
    }

    pub fn velocity_at(&self, elapsed_s: f64) -> [f64; 3] {
        self.axes.map(|a| a.at(elapsed_s))
    }

    /// Advance `state` by `dt` seconds. Velocity comes from the model,
    /// position is integrated with the trapezoid rule.
    pub fn advance(&self, state: PredictorState, dt: f64) -> PredictorState {
        let elapsed_s = state.elapsed_s + dt;
        let velocity = self.velocity_at(elapsed_s);
        let mut position = state.position;
        let mut acceleration = state.acceleration;
        for i in 0..3 {
            position[i] += 0.5 * (state.velocity[i] + velocity[i]) * dt;
            if dt > 0.0 {
                acceleration[i] = (velocity[i] - state.velocity[i]) / dt;
            }
        }
        PredictorState {
            elapsed_s,
            position,
            velocity,
            acceleration,
        }
    }
}
