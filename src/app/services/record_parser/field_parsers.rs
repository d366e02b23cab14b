//! Field parsing utilities for sensor rows
//!
//! Timestamps must match one of three fixed-width layouts exactly:
//! `YYYY-MM-DDTHH:MM:SS` followed by `Z` or `±HH:MM` (RFC 3339), or the same
//! without a zone using `T` or a space as separator. Any of them may carry a
//! fractional second. The shape is checked byte by byte before chrono sees the
//! value, since chrono alone also accepts single-digit fields, a signed year,
//! a lowercase `t`/`z` and a space in RFC 3339.

use crate::constants::NAIVE_TIMESTAMP_LAYOUTS;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Length of `YYYY-MM-DD?HH:MM:SS`
const DATETIME_LEN: usize = 19;

/// Split off the `YYYY-MM-DD<separator>HH:MM:SS` prefix, returning the rest
fn strip_datetime(value: &str, separator: u8) -> Option<&str> {
    let bytes = value.as_bytes();
    if bytes.len() < DATETIME_LEN {
        return None;
    }

    let shape_ok = bytes[..DATETIME_LEN].iter().enumerate().all(|(i, &b)| match i {
        4 | 7 => b == b'-',
        10 => b == separator,
        13 | 16 => b == b':',
        // Seconds never reach 60
        17 => (b'0'..=b'5').contains(&b),
        _ => b.is_ascii_digit(),
    });

    shape_ok.then(|| &value[DATETIME_LEN..])
}

/// Skip an optional `.digits` fractional second
fn strip_fraction(rest: &str) -> Option<&str> {
    match rest.strip_prefix('.') {
        Some(fraction) => {
            let digits = fraction.bytes().take_while(u8::is_ascii_digit).count();
            (digits > 0).then(|| &fraction[digits..])
        }
        None => Some(rest),
    }
}

fn is_zone_suffix(zone: &str) -> bool {
    let bytes = zone.as_bytes();
    zone == "Z"
        || (bytes.len() == 6
            && matches!(bytes[0], b'+' | b'-')
            && bytes[1].is_ascii_digit()
            && bytes[2].is_ascii_digit()
            && bytes[3] == b':'
            && bytes[4].is_ascii_digit()
            && bytes[5].is_ascii_digit())
}

fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    let zone = strip_datetime(value, b'T').and_then(strip_fraction)?;
    if !is_zone_suffix(zone) {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a timestamp, trying RFC 3339 first and then the zone-less layouts
///
/// Zone-less timestamps are taken to be UTC. The result is always normalised
/// to UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Some(dt) = parse_rfc3339(value) {
        return Some(dt);
    }

    NAIVE_TIMESTAMP_LAYOUTS
        .iter()
        .find_map(|&(separator, format)| {
            let rest = strip_datetime(value, separator).and_then(strip_fraction)?;
            if !rest.is_empty() {
                return None;
            }
            NaiveDateTime::parse_from_str(value, format)
                .ok()
                .map(|naive| naive.and_utc())
        })
}

pub fn is_rfc3339(value: &str) -> bool {
    parse_rfc3339(value).is_some()
}

/// Parse a reading value; `NaN` and infinities are rejected
pub fn parse_value(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
