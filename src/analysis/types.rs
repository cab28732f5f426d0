use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::AnalysisError;
use crate::propagate::StateVector;

/// One row of a produced or cached trajectory table. Every column is
/// optional because cached data may have gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrajectoryRow {
    pub timestamp: Option<DateTime<Utc>>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub vx: Option<f64>,
    pub vy: Option<f64>,
    pub vz: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_type: Option<String>,
}

impl TrajectoryRow {
    pub fn position(&self) -> Option<[f64; 3]> {
        Some([self.x?, self.y?, self.z?])
    }

    pub fn velocity(&self) -> Option<[f64; 3]> {
        Some([self.vx?, self.vy?, self.vz?])
    }
}

impl From<&StateVector> for TrajectoryRow {
    fn from(state: &StateVector) -> Self {
        Self {
            timestamp: Some(state.timestamp),
            x: Some(state.x),
            y: Some(state.y),
            z: Some(state.z),
            vx: Some(state.vx),
            vy: Some(state.vy),
            vz: Some(state.vz),
            latitude: Some(state.latitude),
            longitude: Some(state.longitude),
            altitude: Some(state.altitude),
            alert_type: None,
        }
    }
}

pub fn rows_from_states(states: &[StateVector]) -> Vec<TrajectoryRow> {
    states.iter().map(TrajectoryRow::from).collect()
}

/// Numeric columns of a trajectory table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Column {
    X,
    Y,
    Z,
    Vx,
    Vy,
    Vz,
    Latitude,
    Longitude,
    Altitude,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::X,
        Column::Y,
        Column::Z,
        Column::Vx,
        Column::Vy,
        Column::Vz,
        Column::Latitude,
        Column::Longitude,
        Column::Altitude,
    ];

    pub fn value(self, row: &TrajectoryRow) -> Option<f64> {
        let value = match self {
            Column::X => row.x,
            Column::Y => row.y,
            Column::Z => row.z,
            Column::Vx => row.vx,
            Column::Vy => row.vy,
            Column::Vz => row.vz,
            Column::Latitude => row.latitude,
            Column::Longitude => row.longitude,
            Column::Altitude => row.altitude,
        };
        value.filter(|v| v.is_finite())
    }

    pub fn values(self, rows: &[TrajectoryRow]) -> Vec<Option<f64>> {
        rows.iter().map(|row| self.value(row)).collect()
    }
}

impl FromStr for Column {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Column::ALL
            .into_iter()
            .find(|c| <&'static str>::from(*c).eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AnalysisError::UnknownColumn(s.to_string()))
    }
}

/// Length unit of cached position/altitude columns. Kilometers are canonical.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    Kilometers,
    Meters,
}

impl LengthUnit {
    pub fn to_km(self, value: f64) -> f64 {
        match self {
            LengthUnit::Kilometers => value,
            LengthUnit::Meters => value / 1000.0,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "km" | "kilometers" => Ok(LengthUnit::Kilometers),
            "m" | "meters" => Ok(LengthUnit::Meters),
            _ => Err(AnalysisError::UnknownUnit(s.to_string())),
        }
    }
}
