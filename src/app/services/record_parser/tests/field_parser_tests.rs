//! Tests for timestamp and value parsing

use super::super::field_parsers::{is_rfc3339, parse_timestamp, parse_value};
use chrono::{TimeZone, Utc};

#[test]
fn test_all_timestamp_layouts_yield_utc() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();

    assert_eq!(parse_timestamp("2024-01-15T10:30:00Z"), Some(expected));
    assert_eq!(parse_timestamp("2024-01-15T10:30:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-01-15 10:30:00"), Some(expected));
}

#[test]
fn test_offset_is_normalised_to_utc() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
    assert_eq!(parse_timestamp("2024-01-15T10:30:00+02:00"), Some(expected));
}

#[test]
fn test_fractional_seconds_accepted() {
    let parsed = parse_timestamp("2024-01-15 10:30:00.250").unwrap();
    assert_eq!(parsed.timestamp_subsec_millis(), 250);

    let parsed = parse_timestamp("2024-01-15T10:30:00.5").unwrap();
    assert_eq!(parsed.timestamp_subsec_millis(), 500);
}

#[test]
fn test_unparseable_timestamps() {
    assert_eq!(parse_timestamp("bad_ts"), None);
    assert_eq!(parse_timestamp("2024-01-15"), None);
    assert_eq!(parse_timestamp("15/01/2024 10:30"), None);
    assert_eq!(parse_timestamp(""), None);
}

#[test]
fn test_rfc3339_check() {
    assert!(is_rfc3339("2024-01-15T10:30:00Z"));
    assert!(!is_rfc3339("2024-01-15T10:30:00"));
    assert!(!is_rfc3339("timestamp"));
}

#[test]
fn test_value_parsing() {
    assert_eq!(parse_value("23.5"), Some(23.5));
    assert_eq!(parse_value("-4"), Some(-4.0));
    assert_eq!(parse_value("1e3"), Some(1000.0));
    assert_eq!(parse_value("notanumber"), None);
    assert_eq!(parse_value(""), None);
}

#[test]
fn test_non_finite_values_rejected() {
    assert_eq!(parse_value("NaN"), None);
    assert_eq!(parse_value("inf"), None);
    assert_eq!(parse_value("-infinity"), None);
}

#[test]
fn test_lenient_layouts_are_rejected() {
    for value in [
        "2024-01-15 10:30:00Z",
        "2024-01-15t10:30:00z",
        "2024-01-15T10:30:00z",
        "2024-01-15T10:30:00+0200",
        "2024-1-5 1:2:3",
        "2024-1-5T1:2:3",
        "+2024-01-15 10:30:00",
        "2024-01-15T10:30:00.",
        "2024-01-15 10:30:00 ",
        "2024-01-15T23:59:60Z",
    ] {
        assert_eq!(parse_timestamp(value), None, "accepted {:?}", value);
    }
}

#[test]
fn test_rfc3339_requires_uppercase_separator_and_zone() {
    assert!(!is_rfc3339("2024-01-15 10:30:00Z"));
    assert!(!is_rfc3339("2024-01-15t10:30:00Z"));
    assert!(!is_rfc3339("2024-01-15T10:30:00z"));
    assert!(is_rfc3339("2024-01-15T10:30:00.125-05:00"));
}
