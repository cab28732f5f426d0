use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::propagate::StateVector;

/// Time-ordered states for one object. Steps the propagator could not
/// evaluate are absent from `points` and counted in `dropped`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct TrajectorySeries {
    pub norad_id: Option<u64>,
    pub object_name: Option<String>,
    pub points: Vec<StateVector>,
    /// Number of timestamps the sampler generated.
    pub requested: usize,
    pub dropped: usize,
}

impl TrajectorySeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a series from unordered points, sorting by timestamp and
    /// discarding repeated timestamps.
    pub fn from_points(mut points: Vec<StateVector>, requested: usize) -> Self {
        points.sort_by_key(|p| p.timestamp);
        points.dedup_by_key(|p| p.timestamp);
        let dropped = requested.saturating_sub(points.len());
        Self {
            norad_id: None,
            object_name: None,
            points,
            requested,
            dropped,
        }
    }

    pub fn with_identity(mut self, norad_id: u64, object_name: &str) -> Self {
        self.norad_id = Some(norad_id);
        self.object_name = Some(object_name.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.points.iter().map(|p| p.timestamp)
    }
}
