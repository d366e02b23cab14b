//! Header row detection

use super::field_parsers::is_rfc3339;
use crate::constants::{HEADER_KEYWORDS, MIN_COLUMNS};
use csv::StringRecord;

/// Whether the first row of a file is a header
///
/// A row qualifies when it has at least [`MIN_COLUMNS`] columns and its first
/// column either names a time field or is not an RFC 3339 timestamp. The
/// second test also classifies a first data row in a zone-less format as a
/// header, so that row is skipped.
pub fn is_header_row(record: &StringRecord) -> bool {
    if record.len() < MIN_COLUMNS {
        return false;
    }

    let first = record.get(0).unwrap_or_default().trim();
    let lowered = first.to_lowercase();
    if HEADER_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        return true;
    }

    !is_rfc3339(first)
}
