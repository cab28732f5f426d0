use serde::Serialize;
use utoipa::ToSchema;

use super::error::AnalysisError;
use super::types::{Column, TrajectoryRow};

pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Anomaly {
    /// Position of the row in the input.
    pub index: usize,
    pub z_score: f64,
    pub row: TrajectoryRow,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AnomalyReport {
    pub column: Column,
    pub threshold: f64,
    pub anomalies: Vec<Anomaly>,
}

impl AnomalyReport {
    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.anomalies.iter().map(|a| a.index).collect()
    }
}

/// Population z-scores with missing values replaced by the mean of the
/// present ones, so every input position gets a score. `None` when no value
/// is present. A constant column scores zero everywhere.
pub fn z_scores(values: &[Option<f64>]) -> Option<Vec<f64>> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }

    let mean = present.iter().sum::<f64>() / present.len() as f64;
    let imputed: Vec<f64> = values.iter().map(|v| v.unwrap_or(mean)).collect();
    let variance =
        imputed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / imputed.len() as f64;
    let std = variance.sqrt();

    if std == 0.0 || !std.is_finite() {
        return Some(vec![0.0; imputed.len()]);
    }

    Some(imputed.iter().map(|v| (v - mean) / std).collect())
}

/// Flag rows whose `column` z-score magnitude exceeds `threshold`.
pub fn detect_anomalies(
    rows: &[TrajectoryRow],
    column: Column,
    threshold: f64,
) -> Result<AnomalyReport, AnalysisError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(AnalysisError::InvalidThreshold(threshold));
    }

    let anomalies = match z_scores(&column.values(rows)) {
        Some(scores) => rows
            .iter()
            .zip(scores)
            .enumerate()
            .filter(|(_, (_, z))| z.abs() > threshold)
            .map(|(index, (row, z_score))| Anomaly {
                index,
                z_score,
                row: row.clone(),
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(AnomalyReport {
        column,
        threshold,
        anomalies,
    })
}
