use approx::assert_abs_diff_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use orbitdash::analysis::{
    detect_anomalies, orbit_summary, rows_from_states, trajectory_metrics, Column, LengthUnit,
};
use orbitdash::elements::{parse_element_set, parse_tle_text, ElementError};
use orbitdash::predict::{forecast, Confidence};
use orbitdash::propagate::{Frame, MEAN_EARTH_RADIUS_KM, SGP4_EARTH_RADIUS_KM};
use orbitdash::sampler::{sample_records, SampleError, SampleOptions, TrajectorySeries};

const LINE1: &str = "1 25544U 98067A   20148.21301450  .00001715  00000-0  38778-4 0  9992";
const LINE2: &str = "2 25544  51.6435  92.2789 0002570 358.0648 144.9972 15.49396855228767";

fn iss_record() -> Value {
    json!({
        "OBJECT_NAME": "ISS (ZARYA)",
        "NORAD_CAT_ID": 25544,
        "TLE_LINE1": LINE1,
        "TLE_LINE2": LINE2,
    })
}

/// Element set epoch, whole seconds.
fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 5, 27, 5, 6, 44).unwrap()
}

fn sample_orbit(options: &SampleOptions) -> TrajectorySeries {
    let start = epoch();
    sample_records(
        &[iss_record()],
        start,
        start + Duration::minutes(93),
        options,
    )
    .unwrap()
}

#[test]
fn one_orbit_of_the_iss() {
    let series = sample_orbit(&SampleOptions::default());

    assert_eq!(series.len(), 19);
    assert_eq!(series.requested, 19);
    assert_eq!(series.dropped, 0);
    assert_eq!(series.norad_id, Some(25544));
    assert_eq!(series.object_name.as_deref(), Some("ISS (ZARYA)"));

    for p in &series.points {
        assert!(p.altitude > 350.0 && p.altitude < 450.0, "{}", p.altitude);
        assert!(p.latitude.abs() <= 52.0);
        assert!((-180.0..=180.0).contains(&p.longitude));
    }

    // Inertial longitude advances eastward and wraps once per revolution.
    let wraps = series
        .points
        .windows(2)
        .filter(|w| w[1].longitude - w[0].longitude < -180.0)
        .count();
    assert_eq!(wraps, 1);
}

#[test]
fn altitude_is_radius_above_mean_earth() {
    for frame in [Frame::Inertial, Frame::EarthFixed] {
        let options = SampleOptions {
            frame,
            ..SampleOptions::default()
        };
        for p in &sample_orbit(&options).points {
            assert_abs_diff_eq!(p.altitude, p.radius() - MEAN_EARTH_RADIUS_KM, epsilon = 1e-9);
        }
    }
}

#[test]
fn parallel_output_is_sorted_and_unique() {
    let options = SampleOptions {
        step_minutes: 0.5,
        parallel: true,
        ..SampleOptions::default()
    };
    let series = sample_orbit(&options);
    assert_eq!(series.len(), 187);
    assert!(series
        .points
        .windows(2)
        .all(|w| w[0].timestamp < w[1].timestamp));
    assert_eq!(series, sample_orbit(&SampleOptions { parallel: false, ..options }));
}

#[test]
fn step_equal_to_window_gives_two_points() {
    let start = epoch();
    let options = SampleOptions {
        step_minutes: 60.0,
        ..SampleOptions::default()
    };
    let end = start + Duration::hours(1);
    let series = sample_records(&[iss_record()], start, end, &options).unwrap();
    assert_eq!(series.len(), 2);
}

#[test]
fn missing_lines_surface_from_parser_and_sampler() {
    let record = json!({"OBJECT_NAME": "DEBRIS", "NORAD_CAT_ID": 1});

    assert!(matches!(
        parse_element_set(&record),
        Err(ElementError::MissingElementData(_))
    ));

    let start = epoch();
    let err = sample_records(&[record], start, start, &SampleOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        SampleError::Elements(ElementError::MissingElementData(_))
    ));
}

#[test]
fn empty_input_and_bad_step() {
    let start = epoch();
    let end = start + Duration::hours(1);
    let series = sample_records(&[], start, end, &SampleOptions::default()).unwrap();
    assert!(series.is_empty());

    let options = SampleOptions {
        step_minutes: 0.0,
        ..SampleOptions::default()
    };
    assert!(matches!(
        sample_records(&[iss_record()], start, start, &options),
        Err(SampleError::InvalidStep(_))
    ));
}

#[test]
fn tle_text_feeds_the_sampler() {
    let text = format!("ISS (ZARYA)\n{LINE1}\n{LINE2}\n");
    let records = parse_tle_text(&text);
    let start = epoch();
    let end = start + Duration::minutes(10);
    let series = sample_records(&records, start, end, &SampleOptions::default()).unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.norad_id, Some(25544));
}

#[test]
fn analysis_over_a_sampled_orbit() {
    let series = sample_orbit(&SampleOptions::default());
    let rows = rows_from_states(&series.points);

    let metrics = trajectory_metrics(&rows, LengthUnit::Kilometers);
    assert_abs_diff_eq!(metrics.duration, 1.5, epsilon = 1e-9);
    // Chords of a ~6800 km circle at 5 minute spacing, about 7.6 km/s.
    assert!(metrics.avg_speed > 26_000.0 && metrics.avg_speed < 28_000.0);
    assert!(metrics.min_altitude > 350.0 && metrics.max_altitude < 450.0);

    let orbit = orbit_summary(&rows, LengthUnit::Kilometers).unwrap();
    assert!(orbit.period_minutes > 91.0 && orbit.period_minutes < 94.0);

    let report = detect_anomalies(&rows, Column::Altitude, 3.0).unwrap();
    assert!(report.is_empty());
}

#[test]
fn forecast_from_a_sampled_arc() {
    let start = epoch();
    let options = SampleOptions {
        step_minutes: 1.0,
        ..SampleOptions::default()
    };
    let end = start + Duration::minutes(15);
    let series = sample_records(&[iss_record()], start, end, &options).unwrap();
    let rows = rows_from_states(&series.points);

    let result = forecast(&rows, Duration::minutes(10), Duration::minutes(5)).unwrap();
    assert_eq!(result.points.len(), 16 + 3);
    assert!(result.points[16..].iter().all(|p| p.predicted));
    assert!(result.r_squared.is_finite() && result.r_squared <= 1.0);
    assert_eq!(result.confidence, Confidence::from_r_squared(result.r_squared));
}

#[test]
fn decayed_steps_are_dropped_not_errors() {
    // B* raised a thousandfold; the orbit reaches the ground within ten days.
    let record = json!({
        "NORAD_CAT_ID": 25544,
        "TLE_LINE1": "1 25544U 98067A   20148.21301450  .00001715  00000-0  38778-1 0  9999",
        "TLE_LINE2": LINE2,
    });
    let start = epoch();
    let options = SampleOptions {
        step_minutes: 24.0 * 60.0,
        ..SampleOptions::default()
    };
    let series = sample_records(&[record], start, start + Duration::days(30), &options).unwrap();

    assert_eq!(series.requested, 31);
    assert!(series.len() >= 2);
    assert!(series.dropped >= 21);
    assert_eq!(series.len() + series.dropped, series.requested);
    assert!(series.timestamps().all(|t| t < start + Duration::days(10)));
    assert!(series
        .points
        .iter()
        .all(|p| p.radius() >= SGP4_EARTH_RADIUS_KM));
}
