use std::f64::consts::PI;

use serde::Serialize;
use utoipa::ToSchema;

use super::types::{LengthUnit, TrajectoryRow};
use crate::propagate::MEAN_EARTH_RADIUS_KM;

pub const EARTH_MU_KM3_S2: f64 = 398_600.441_8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct OrbitSummary {
    pub samples: usize,
    pub mean_altitude_km: f64,
    /// Period of a circular orbit at the mean altitude.
    pub period_minutes: f64,
}

pub fn orbit_summary(rows: &[TrajectoryRow], unit: LengthUnit) -> Option<OrbitSummary> {
    let altitudes: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.altitude)
        .filter(|a| a.is_finite())
        .map(|a| unit.to_km(a))
        .collect();
    if altitudes.is_empty() {
        return None;
    }

    let mean_altitude_km = altitudes.iter().sum::<f64>() / altitudes.len() as f64;
    let semi_major_axis = mean_altitude_km + MEAN_EARTH_RADIUS_KM;
    if semi_major_axis <= 0.0 {
        return None;
    }

    Some(OrbitSummary {
        samples: altitudes.len(),
        mean_altitude_km,
        period_minutes: circular_period_minutes(semi_major_axis),
    })
}

pub fn circular_period_minutes(semi_major_axis_km: f64) -> f64 {
    2.0 * PI * (semi_major_axis_km.powi(3) / EARTH_MU_KM3_S2).sqrt() / 60.0
}
