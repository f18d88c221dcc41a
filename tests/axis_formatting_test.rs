// tests/axis_formatting_test.rs

use stream_log_render::plot_framework::{format_axis_value, grow_range, grow_x_range};

#[test]
fn test_small_fractional_values_keep_one_decimal() {
    let values = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0, 1.2];
    let expected = ["0", "0.2", "0.4", "0.6", "0.8", "1", "1.2"];
    for (value, expected) in values.iter().zip(expected.iter()) {
        assert_eq!(&format_axis_value(*value, "(ms)"), expected, "value {value}");
    }
}

#[test]
fn test_large_values_use_k_and_m_suffixes() {
    assert_eq!(format_axis_value(1600.0, "(bytes)"), "2k");
    assert_eq!(format_axis_value(12_000.0, "(bytes)"), "12k");
    assert_eq!(format_axis_value(2_500_000.0, "(bytes)"), "2.5M");
    assert_eq!(format_axis_value(-3000.0, "(#/s)"), "-3k");
}

#[test]
fn test_db_axis_stays_integer() {
    assert_eq!(format_axis_value(0.4, "(dB)"), "0");
    assert_eq!(format_axis_value(-42.0, "(dBm)"), "-42");
    assert_eq!(format_axis_value(2000.0, "(dB)"), "2000");
}

#[test]
fn test_range_grows_past_defaults() {
    let data = vec![(0.0, -20.0), (1.0, 150.0)];
    let range = grow_range((0.0, 100.0), &[&data]);
    assert!((range.end - 180.0).abs() < 1e-9);
    assert!((range.start + 24.0).abs() < 1e-9);

    let inside = vec![(0.0, 10.0)];
    assert_eq!(grow_range((0.0, 100.0), &[&inside]), 0.0..100.0);
    let grown = grow_x_range((0.0, 10.0), 20.0);
    assert_eq!(grown.start, 0.0);
    assert!((grown.end - 24.0).abs() < 1e-9);
    assert_eq!(grow_x_range((0.0, 10.0), 5.0), 0.0..10.0);
}

// tests/axis_formatting_test.rs
