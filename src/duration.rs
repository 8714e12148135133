//! Parsing and formatting of `"<n> hours"` duration labels.
use crate::schema::duration::UNIT_SUFFIX;

/// Extract the hour count from a duration label.
///
/// Takes the first run of ASCII digits. A `-` directly in front of that run makes the value
/// negative, wherever it sits in the text: `"ETA -3 hours"` reads as -3, not 3. This lets
/// labels written by [`format_hours`] for negative values read back unchanged.
/// Labels without digits, or with a digit run too long for `i64`, count as zero.
pub fn parse_hours(label: &str) -> i64 {
    try_parse_hours(label).unwrap_or(0)
}

/// Like [`parse_hours`], but `None` when the label has no usable digit run.
pub fn try_parse_hours(label: &str) -> Option<i64> {
    let bytes = label.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |offset| start + offset);

    let value = label[start..end].parse::<i64>().ok()?;

    if start > 0 && bytes[start - 1] == b'-' {
        Some(-value)
    } else {
        Some(value)
    }
}

/// Canonical serialization of an hour count.
pub fn format_hours(hours: i64) -> String {
    format!("{hours} {UNIT_SUFFIX}")
}

/// Parse a delay value stored as a numeric string. Anything unparseable is zero.
pub fn parse_delay(raw: &str) -> i64 {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.trunc() as i64)
        })
        .unwrap_or(0)
}
