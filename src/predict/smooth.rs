use chrono::Duration;

use super::types::PredictedPoint;

pub const MAX_SMOOTH_SAMPLES: usize = 10_000;

/// Natural cubic spline through strictly increasing knots.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    t: Vec<f64>,
    y: Vec<f64>,
    /// Second derivative at each knot; zero at both ends.
    m: Vec<f64>,
}

impl CubicSpline {
    /// `None` unless there are at least two knots with strictly increasing `t`.
    pub fn new(t: &[f64], y: &[f64]) -> Option<Self> {
        let n = t.len();
        if n < 2 || y.len() != n || t.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }

        let h: Vec<f64> = t.windows(2).map(|w| w[1] - w[0]).collect();
        let mut m = vec![0.0; n];

        // Tridiagonal system for the interior second derivatives, solved with
        // the Thomas algorithm.
        let interior = n - 2;
        if interior > 0 {
            let mut diag = vec![0.0; interior];
            let mut rhs = vec![0.0; interior];
            for k in 0..interior {
                let i = k + 1;
                diag[k] = 2.0 * (h[i - 1] + h[i]);
                rhs[k] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
            }
            for k in 1..interior {
                let w = h[k] / diag[k - 1];
                diag[k] -= w * h[k];
                rhs[k] -= w * rhs[k - 1];
            }
            m[interior] = rhs[interior - 1] / diag[interior - 1];
            for k in (0..interior - 1).rev() {
                m[k + 1] = (rhs[k] - h[k + 1] * m[k + 2]) / diag[k];
            }
        }

        Some(CubicSpline {
            t: t.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    fn segment(&self, x: f64) -> usize {
        self.t
            .partition_point(|ti| *ti <= x)
            .saturating_sub(1)
            .min(self.t.len() - 2)
    }

    pub fn value(&self, x: f64) -> f64 {
        let i = self.segment(x);
        let h = self.t[i + 1] - self.t[i];
        let a = (self.t[i + 1] - x) / h;
        let b = (x - self.t[i]) / h;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a.powi(3) - a) * self.m[i] + (b.powi(3) - b) * self.m[i + 1]) * h * h / 6.0
    }

    pub fn derivative(&self, x: f64) -> f64 {
        let i = self.segment(x);
        let h = self.t[i + 1] - self.t[i];
        let a = (self.t[i + 1] - x) / h;
        let b = (x - self.t[i]) / h;
        (self.y[i + 1] - self.y[i]) / h - (3.0 * a * a - 1.0) / 6.0 * h * self.m[i]
            + (3.0 * b * b - 1.0) / 6.0 * h * self.m[i + 1]
    }
}

/// Resample time-ordered points onto `samples` evenly spaced instants with a
/// cubic spline per axis. Velocities are the spline derivatives. A point is
/// flagged `predicted` when it lies past the last observed point. Repeated
/// timestamps keep their first point. Empty when fewer than two distinct
/// timestamps or samples are available. `samples` is capped at
/// `MAX_SMOOTH_SAMPLES`.
pub fn smooth_trajectory(points: &[PredictedPoint], samples: usize) -> Vec<PredictedPoint> {
    let samples = samples.min(MAX_SMOOTH_SAMPLES);
    let mut knots: Vec<&PredictedPoint> = points.iter().collect();
    knots.sort_by_key(|p| p.timestamp);
    knots.dedup_by_key(|p| p.timestamp);
    if knots.len() < 2 || samples < 2 {
        return Vec::new();
    }

    let origin = knots[0].timestamp;
    let t: Vec<f64> = knots
        .iter()
        .map(|p| (p.timestamp - origin).num_milliseconds() as f64 / 1000.0)
        .collect();
    let axis = |f: fn(&PredictedPoint) -> f64| {
        let y: Vec<f64> = knots.iter().map(|p| f(p)).collect();
        CubicSpline::new(&t, &y)
    };
    let (Some(sx), Some(sy), Some(sz)) = (axis(|p| p.x), axis(|p| p.y), axis(|p| p.z)) else {
        return Vec::new();
    };

    let last_observed = knots
        .iter()
        .zip(&t)
        .filter(|(p, _)| !p.predicted)
        .map(|(_, t)| *t)
        .last()
        .unwrap_or(f64::NEG_INFINITY);

    let span = t[t.len() - 1];
    (0..samples)
        .map(|k| {
            let s = span * k as f64 / (samples - 1) as f64;
            PredictedPoint {
                timestamp: origin + Duration::milliseconds((s * 1000.0).round() as i64),
                x: sx.value(s),
                y: sy.value(s),
                z: sz.value(s),
                vx: sx.derivative(s),
                vy: sy.derivative(s),
                vz: sz.derivative(s),
                predicted: s > last_observed,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{DateTime, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn point(seconds: i64, x: f64, predicted: bool) -> PredictedPoint {
        PredictedPoint {
            timestamp: t0() + Duration::seconds(seconds),
            x,
            y: 0.0,
            z: 0.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            predicted,
        }
    }

    #[test]
    fn spline_passes_through_knots() {
        let t = [0.0, 1.0, 2.5, 4.0, 7.0];
        let y = [1.0, -2.0, 0.5, 3.0, 2.0];
        let spline = CubicSpline::new(&t, &y).unwrap();
        for (ti, yi) in t.iter().zip(y) {
            assert_abs_diff_eq!(spline.value(*ti), yi, epsilon = 1e-12);
        }
    }

    #[test]
    fn spline_of_a_line_is_the_line() {
        let t = [0.0, 2.0, 3.0, 7.0];
        let y: Vec<f64> = t.iter().map(|t| 3.0 * t - 1.0).collect();
        let spline = CubicSpline::new(&t, &y).unwrap();
        for x in [0.5, 2.5, 6.9] {
            assert_abs_diff_eq!(spline.value(x), 3.0 * x - 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(spline.derivative(x), 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn spline_rejects_unordered_knots() {
        assert!(CubicSpline::new(&[0.0, 0.0], &[1.0, 2.0]).is_none());
        assert!(CubicSpline::new(&[0.0], &[1.0]).is_none());
    }

    #[test]
    fn resamples_evenly_and_flags_predicted_segment() {
        let points: Vec<PredictedPoint> = (0..10)
            .map(|i| point(60 * i, 450.0 * i as f64, i >= 6))
            .collect();
        let smooth = smooth_trajectory(&points, 19);

        assert_eq!(smooth.len(), 19);
        assert_eq!(smooth[0].timestamp, t0());
        assert_eq!(smooth[18].timestamp, t0() + Duration::seconds(540));
        for p in &smooth {
            let s = (p.timestamp - t0()).num_milliseconds() as f64 / 1000.0;
            assert_abs_diff_eq!(p.x, 7.5 * s, epsilon = 1e-6);
            assert_abs_diff_eq!(p.vx, 7.5, epsilon = 1e-9);
            // Last observed knot is at 300 s.
            assert_eq!(p.predicted, s > 300.0);
        }
    }

    #[test]
    fn too_few_points_give_nothing() {
        assert!(smooth_trajectory(&[point(0, 0.0, false)], 10).is_empty());
        let same_instant = [point(0, 0.0, false), point(0, 1.0, true)];
        assert!(smooth_trajectory(&same_instant, 10).is_empty());
        let two = [point(0, 0.0, false), point(60, 1.0, true)];
        assert!(smooth_trajectory(&two, 1).is_empty());
        assert_eq!(smooth_trajectory(&two, usize::MAX).len(), MAX_SMOOTH_SAMPLES);
    }
}
