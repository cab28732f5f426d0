use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use serde_json::Value;

use super::error::SampleError;
use super::series::TrajectorySeries;
use crate::elements::{parse_element_set, OrbitalElementSet};
use crate::propagate::{Frame, Propagate, StateVector};

pub const DEFAULT_STEP_MINUTES: f64 = 5.0;
pub const DEFAULT_STALE_AFTER_DAYS: i64 = 14;
/// Upper bound on the timestamps one request may generate.
pub const MAX_SAMPLE_STEPS: i64 = 1_000_000;

#[derive(Debug, Clone, Copy)]
pub struct SampleOptions {
    pub step_minutes: f64,
    pub frame: Frame,
    pub parallel: bool,
    /// Distance from epoch past which a warning is logged.
    pub stale_after: Duration,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_STEP_MINUTES,
            frame: Frame::Inertial,
            parallel: false,
            stale_after: Duration::days(DEFAULT_STALE_AFTER_DAYS),
        }
    }
}

/// Sample raw upstream records. Records are ordered most recent first and
/// only the first one is propagated; a structurally invalid first record is
/// a hard error.
pub fn sample_records(
    records: &[Value],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    options: &SampleOptions,
) -> Result<TrajectorySeries, SampleError> {
    step_duration(options.step_minutes)?;

    let Some(record) = records.first() else {
        log::warn!("No element records supplied, returning empty series");
        return Ok(TrajectorySeries::empty());
    };

    let set = parse_element_set(record)?;
    sample_series(std::slice::from_ref(&set), start, end, options)
}

/// Sample already-parsed element sets (most recent first).
pub fn sample_series(
    sets: &[OrbitalElementSet],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    options: &SampleOptions,
) -> Result<TrajectorySeries, SampleError> {
    step_duration(options.step_minutes)?;

    let Some(set) = sets.first() else {
        log::warn!("No element sets supplied, returning empty series");
        return Ok(TrajectorySeries::empty());
    };

    warn_if_stale(set, start, end, options.stale_after);

    let series = sample_with(set, start, end, options)?;
    Ok(series.with_identity(set.norad_id, &set.object_name))
}

/// Evaluate `propagator` at every step of `[start, end]`. Steps that yield
/// no state are dropped; the result is sorted by timestamp whether or not
/// the steps ran in parallel.
pub fn sample_with<P>(
    propagator: &P,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    options: &SampleOptions,
) -> Result<TrajectorySeries, SampleError>
where
    P: Propagate + Sync + ?Sized,
{
    let timestamps = step_timestamps(start, end, options.step_minutes)?;
    let frame = options.frame;

    let points: Vec<StateVector> = if options.parallel {
        timestamps
            .par_iter()
            .filter_map(|t| propagator.state_at(*t, frame))
            .collect()
    } else {
        timestamps
            .iter()
            .filter_map(|t| propagator.state_at(*t, frame))
            .collect()
    };

    let series = TrajectorySeries::from_points(points, timestamps.len());
    if series.dropped > 0 {
        log::info!(
            "Sampled {} of {} steps, dropped {}",
            series.len(),
            series.requested,
            series.dropped
        );
    }
    Ok(series)
}

/// `start, start + step, ...` up to and including `end`, never past it.
pub fn step_timestamps(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_minutes: f64,
) -> Result<Vec<DateTime<Utc>>, SampleError> {
    let step = step_duration(step_minutes)?;
    if end < start {
        return Ok(Vec::new());
    }

    let requested = (end - start).num_milliseconds() / step.num_milliseconds() + 1;
    if requested > MAX_SAMPLE_STEPS {
        return Err(SampleError::TooManySteps {
            requested,
            limit: MAX_SAMPLE_STEPS,
        });
    }

    let mut cursor = start;
    let mut timestamps = Vec::with_capacity(requested as usize);

    while cursor <= end {
        timestamps.push(cursor);
        match cursor.checked_add_signed(step) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    Ok(timestamps)
}

fn step_duration(step_minutes: f64) -> Result<Duration, SampleError> {
    let millis = (step_minutes * 60_000.0).round();
    if !step_minutes.is_finite() || millis < 1.0 || millis >= i64::MAX as f64 {
        return Err(SampleError::InvalidStep(step_minutes));
    }
    Ok(Duration::milliseconds(millis as i64))
}

fn warn_if_stale(
    set: &OrbitalElementSet,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    limit: Duration,
) {
    if set.is_stale_at(start, limit) || set.is_stale_at(end, limit) {
        log::warn!(
            "Elements for {} ({}) have epoch {}, more than {} days from the requested window",
            set.object_name,
            set.norad_id,
            set.epoch,
            limit.num_days()
        );
    }
}
