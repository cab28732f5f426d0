use serde::Serialize;
use utoipa::ToSchema;

use super::types::{Column, TrajectoryRow};

/// Descriptive statistics for one column. Moments that are undefined for the
/// sample size (std below 2 values, skewness below 3, kurtosis below 4) are NaN,
/// which serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ColumnStats {
    pub column: Column,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

/// Statistics for every column with at least one value, rounded to four
/// decimals.
pub fn describe(rows: &[TrajectoryRow]) -> Vec<ColumnStats> {
    Column::ALL
        .into_iter()
        .filter_map(|column| {
            let values: Vec<f64> = column.values(rows).into_iter().flatten().collect();
            describe_values(column, values)
        })
        .collect()
}

fn describe_values(column: Column, mut values: Vec<f64>) -> Option<ColumnStats> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let central = |k: i32| values.iter().map(|v| (v - mean).powi(k)).sum::<f64>() / n;
    let (m2, m3, m4) = (central(2), central(3), central(4));

    let std = if values.len() > 1 {
        (m2 * n / (n - 1.0)).sqrt()
    } else {
        f64::NAN
    };

    // Adjusted Fisher-Pearson skewness and excess kurtosis.
    let skewness = if values.len() < 3 {
        f64::NAN
    } else if m2 == 0.0 {
        0.0
    } else {
        (n * (n - 1.0)).sqrt() / (n - 2.0) * m3 / m2.powf(1.5)
    };
    let kurtosis = if values.len() < 4 {
        f64::NAN
    } else if m2 == 0.0 {
        0.0
    } else {
        (n - 1.0) / ((n - 2.0) * (n - 3.0)) * ((n + 1.0) * m4 / (m2 * m2) - 3.0 * (n - 1.0))
    };

    let q50 = quantile(&values, 0.5);

    Some(ColumnStats {
        column,
        count: values.len(),
        mean: round4(mean),
        median: round4(q50),
        std: round4(std),
        min: round4(values[0]),
        q25: round4(quantile(&values, 0.25)),
        q50: round4(q50),
        q75: round4(quantile(&values, 0.75)),
        max: round4(values[values.len() - 1]),
        skewness: round4(skewness),
        kurtosis: round4(kurtosis),
    })
}

/// Linear-interpolated quantile of sorted, non-empty `values`.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn x_rows(values: &[f64]) -> Vec<TrajectoryRow> {
        values
            .iter()
            .map(|v| TrajectoryRow {
                x: Some(*v),
                ..TrajectoryRow::default()
            })
            .collect()
    }

    #[test]
    fn describes_only_populated_columns() {
        let stats = describe(&x_rows(&[1.0, 2.0]));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].column, Column::X);
    }

    #[test]
    fn matches_reference_values() {
        let stats = describe(&x_rows(&[2.0, 8.0, 4.0, 1.0, 10.0]));
        let s = &stats[0];
        assert_eq!(s.count, 5);
        assert_abs_diff_eq!(s.mean, 5.0);
        assert_abs_diff_eq!(s.median, 4.0);
        assert_abs_diff_eq!(s.min, 1.0);
        assert_abs_diff_eq!(s.max, 10.0);
        assert_abs_diff_eq!(s.q25, 2.0);
        assert_abs_diff_eq!(s.q75, 8.0);
        // sample variance = 60 / 4
        assert_abs_diff_eq!(s.std, 3.873, epsilon = 1e-9);
        assert_abs_diff_eq!(s.skewness, 0.4303, epsilon = 1e-9);
        assert_abs_diff_eq!(s.kurtosis, -2.2, epsilon = 1e-9);
    }

    #[test]
    fn interpolates_quantiles() {
        let stats = describe(&x_rows(&[1.0, 2.0, 3.0, 4.0]));
        assert_abs_diff_eq!(stats[0].q25, 1.75);
        assert_abs_diff_eq!(stats[0].median, 2.5);
        assert_abs_diff_eq!(stats[0].q75, 3.25);
    }

    #[test]
    fn small_samples_leave_higher_moments_undefined() {
        let stats = describe(&x_rows(&[3.0]));
        assert!(stats[0].std.is_nan());
        assert!(stats[0].skewness.is_nan());
        assert!(stats[0].kurtosis.is_nan());
        assert_abs_diff_eq!(stats[0].median, 3.0);
    }

    #[test]
    fn constant_column_has_zero_shape() {
        let stats = describe(&x_rows(&[7.0; 6]));
        assert_abs_diff_eq!(stats[0].std, 0.0);
        assert_abs_diff_eq!(stats[0].skewness, 0.0);
        assert_abs_diff_eq!(stats[0].kurtosis, 0.0);
    }
}
