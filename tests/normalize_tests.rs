use approx::assert_abs_diff_eq;
use yarn_chart::core::{
    DEFAULT_NORMALIZE_SCALE, SampleSeries, ValueBounds, generate_x_data, normalize_array,
    remove_redundant,
};
use yarn_chart::ChartError;

#[test]
fn omitted_x_data_defaults_to_indices() {
    let x = generate_x_data(&[3.0, 1.0, 4.0, 1.0, 5.0], None);
    assert_eq!(x, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn supplied_x_data_is_an_independent_copy() {
    let source = vec![10.0, 20.0, 30.0];
    let mut copy = generate_x_data(&[1.0, 2.0, 3.0], Some(&source));
    copy[0] = -1.0;
    assert_eq!(source, vec![10.0, 20.0, 30.0]);
}

#[test]
fn run_of_ten_collapses_to_first_and_last_three() {
    let mut y = vec![1.0, 2.0];
    y.extend(std::iter::repeat_n(7.0, 10));
    y.extend([3.0, 4.0]);
    let mut x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();

    remove_redundant(&mut x, &mut y);

    assert_eq!(
        y,
        vec![1.0, 2.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 3.0, 4.0]
    );
    assert_eq!(
        x,
        vec![0.0, 1.0, 2.0, 3.0, 4.0, 9.0, 10.0, 11.0, 12.0, 13.0]
    );
}

#[test]
fn multiple_runs_collapse_independently() {
    let mut y = vec![0.0; 8];
    y.push(1.0);
    y.extend(vec![2.0; 9]);
    let mut x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();

    remove_redundant(&mut x, &mut y);

    assert_eq!(y.len(), 6 + 1 + 6);
    assert_eq!(x, vec![0.0, 1.0, 2.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 15.0, 16.0, 17.0]);
}

#[test]
fn normalization_maps_extremes_onto_scale() {
    let mut values = vec![2.0, 4.0, 10.0, 6.0];
    normalize_array(&mut values, DEFAULT_NORMALIZE_SCALE, None);

    assert_abs_diff_eq!(values[0], -DEFAULT_NORMALIZE_SCALE, epsilon = 1e-12);
    assert_abs_diff_eq!(values[2], DEFAULT_NORMALIZE_SCALE, epsilon = 1e-12);
    assert_abs_diff_eq!(values[1], -0.4625, epsilon = 1e-12);
    assert_abs_diff_eq!(values[3], 0.0, epsilon = 1e-12);
}

#[test]
fn degenerate_range_is_widened_instead_of_failing() {
    let mut values = vec![5.0, 5.0, 5.0];
    normalize_array(&mut values, 1.0, None);
    assert!(values.iter().all(|v| v.is_finite() && v.abs() <= 1e-9));

    let mut pinned = vec![1.0, 2.0];
    normalize_array(&mut pinned, 1.0, Some(ValueBounds::new(3.0, 3.0)));
    assert!(pinned.iter().all(|v| v.is_finite()));
}

#[test]
fn explicit_bounds_keep_axis_stable() {
    let mut first = vec![0.0, 50.0];
    let mut second = vec![0.0, 25.0];
    let bounds = Some(ValueBounds::new(0.0, 100.0));
    normalize_array(&mut first, 1.0, bounds);
    normalize_array(&mut second, 1.0, bounds);
    assert_eq!(first[0], second[0]);
    assert_abs_diff_eq!(first[1], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(second[1], -0.5, epsilon = 1e-12);
}

#[test]
fn series_rejects_malformed_input() {
    let err = SampleSeries::new(&[1.0, 2.0, 3.0], Some(&[0.0, 1.0])).expect_err("mismatch");
    assert!(matches!(
        err,
        ChartError::MismatchedSeries { x_len: 2, y_len: 3 }
    ));

    let err = SampleSeries::new(&[1.0], None).expect_err("single sample");
    assert!(matches!(err, ChartError::InsufficientSamples { len: 1 }));

    let err = SampleSeries::new(&[1.0, f64::NAN], None).expect_err("nan");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn series_from_timestamped_decimals_uses_unix_seconds() {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("time");
    let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).single().expect("time");
    let series = SampleSeries::from_timestamped(&[
        (t0, Decimal::new(1050, 2)),
        (t1, Decimal::new(-25, 1)),
    ])
    .expect("series");

    assert_eq!(series.x()[1] - series.x()[0], 60.0);
    assert_eq!(series.y(), &[10.5, -2.5]);
}
