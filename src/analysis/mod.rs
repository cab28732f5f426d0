mod anomaly;
mod error;
mod metrics;
mod orbit;
mod stats;
mod types;

pub use anomaly::{detect_anomalies, z_scores, Anomaly, AnomalyReport, DEFAULT_Z_THRESHOLD};
pub use error::AnalysisError;
pub use metrics::{trajectory_metrics, TrajectoryMetrics};
pub(crate) use metrics::sorted_by_time;
pub use orbit::{circular_period_minutes, orbit_summary, OrbitSummary, EARTH_MU_KM3_S2};
pub use stats::{describe, ColumnStats};
pub use types::{rows_from_states, Column, LengthUnit, TrajectoryRow};
