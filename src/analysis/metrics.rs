use serde::Serialize;
use utoipa::ToSchema;

use super::types::{LengthUnit, TrajectoryRow};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct TrajectoryMetrics {
    /// Kilometers.
    pub total_distance: f64,
    /// Hours.
    pub duration: f64,
    /// Kilometers per hour.
    pub avg_speed: f64,
    pub max_altitude: f64,
    pub min_altitude: f64,
    pub alerts_count: usize,
}

/// Aggregate metrics over a possibly unordered trajectory table whose
/// position and altitude columns are in `unit`.
pub fn trajectory_metrics(rows: &[TrajectoryRow], unit: LengthUnit) -> TrajectoryMetrics {
    let ordered = sorted_by_time(rows);

    let total_distance = unit.to_km(path_length(&ordered));
    let duration = duration_hours(&ordered);
    let avg_speed = if duration > 0.0 {
        total_distance / duration
    } else {
        0.0
    };

    let altitudes = rows
        .iter()
        .filter_map(|r| r.altitude)
        .filter(|a| a.is_finite())
        .map(|a| unit.to_km(a));
    let (min_altitude, max_altitude) = altitudes
        .fold(None, |acc: Option<(f64, f64)>, a| match acc {
            None => Some((a, a)),
            Some((lo, hi)) => Some((lo.min(a), hi.max(a))),
        })
        .unwrap_or((0.0, 0.0));

    let alerts_count = rows
        .iter()
        .filter(|r| r.alert_type.as_deref().is_some_and(|a| !a.trim().is_empty()))
        .count();

    TrajectoryMetrics {
        total_distance,
        duration,
        avg_speed,
        max_altitude,
        min_altitude,
        alerts_count,
    }
}

/// Rows ordered by timestamp; rows without one go last, in input order.
pub(crate) fn sorted_by_time(rows: &[TrajectoryRow]) -> Vec<&TrajectoryRow> {
    let mut ordered: Vec<&TrajectoryRow> = rows.iter().collect();
    ordered.sort_by_key(|r| (r.timestamp.is_none(), r.timestamp));
    ordered
}

fn path_length(ordered: &[&TrajectoryRow]) -> f64 {
    ordered
        .windows(2)
        .filter_map(|pair| {
            let a = pair[0].position()?;
            let b = pair[1].position()?;
            let d = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2) + (b[2] - a[2]).powi(2)).sqrt();
            d.is_finite().then_some(d)
        })
        .sum()
}

fn duration_hours(ordered: &[&TrajectoryRow]) -> f64 {
    let timestamps: Option<Vec<_>> = ordered.iter().map(|r| r.timestamp).collect();
    match timestamps.as_deref() {
        Some([first, .., last]) => (*last - *first).num_milliseconds() as f64 / 3_600_000.0,
        _ => 0.0,
    }
}
