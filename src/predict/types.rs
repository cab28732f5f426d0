use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// One row of a forecast. History rows carry `predicted: false`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PredictedPoint {
    pub timestamp: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub predicted: bool,
}

impl PredictedPoint {
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Qualitative label for the model's coefficient of determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    #[strum(to_string = "Very High")]
    VeryHigh,
    High,
    Medium,
    Low,
    #[strum(to_string = "Very Low")]
    VeryLow,
}

impl Confidence {
    pub fn from_r_squared(r2: f64) -> Self {
        if r2 > 0.9 {
            Confidence::VeryHigh
        } else if r2 > 0.7 {
            Confidence::High
        } else if r2 > 0.5 {
            Confidence::Medium
        } else if r2 > 0.3 {
            Confidence::Low
        } else {
            Confidence::VeryLow
        }
    }
}

/// Extent of the predicted segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PredictionSpan {
    /// Straight-line distance between the first and last predicted positions.
    pub distance_km: f64,
    pub timespan_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Forecast {
    /// History followed by predictions, ordered by timestamp.
    pub points: Vec<PredictedPoint>,
    pub r_squared: f64,
    pub confidence: Confidence,
    pub span: Option<PredictionSpan>,
    /// Spline resampling of `points`, when requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub smooth: Vec<PredictedPoint>,
}

impl Forecast {
    pub fn with_smooth(mut self, samples: usize) -> Self {
        self.smooth = super::smooth::smooth_trajectory(&self.points, samples);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_thresholds_are_exclusive() {
        assert_eq!(Confidence::from_r_squared(0.95), Confidence::VeryHigh);
        assert_eq!(Confidence::from_r_squared(0.9), Confidence::High);
        assert_eq!(Confidence::from_r_squared(0.7), Confidence::Medium);
        assert_eq!(Confidence::from_r_squared(0.51), Confidence::Medium);
        assert_eq!(Confidence::from_r_squared(0.31), Confidence::Low);
        assert_eq!(Confidence::from_r_squared(0.3), Confidence::VeryLow);
        assert_eq!(Confidence::from_r_squared(f64::NAN), Confidence::VeryLow);
    }

    #[test]
    fn confidence_display() {
        assert_eq!(Confidence::VeryHigh.to_string(), "Very High");
        assert_eq!(Confidence::Medium.to_string(), "Medium");
    }
}
