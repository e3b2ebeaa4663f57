//! Delta time formatting for ETA display.

/// Unit suffixes scanned most significant first.
const TIME_SUFFIXES: &[(char, f64)] = &[
    ('d', 1000.0 * 60.0 * 60.0 * 24.0),
    ('h', 1000.0 * 60.0 * 60.0),
    ('m', 1000.0 * 60.0),
    ('s', 1000.0),
];

/// Format a millisecond delta with its most significant unit suffix.
///
/// Returns the first of days, hours, minutes, seconds whose unit size the
/// delta meets or exceeds, one-decimal by default or integer-rounded when
/// `rounded` is set. Deltas under one second fall back to `<ms>ms`.
///
/// ```
/// use glint::timefmt::format_delta_time;
///
/// assert_eq!(format_delta_time(1500.0, false), "1.5s");
/// assert_eq!(format_delta_time(1500.0, true), "2s");
/// assert_eq!(format_delta_time(500.0, false), "500ms");
/// ```
pub fn format_delta_time(delta_ms: f64, rounded: bool) -> String {
    for &(suffix, unit) in TIME_SUFFIXES {
        if delta_ms >= unit {
            let scaled = delta_ms / unit;
            return if rounded {
                format!("{}{}", scaled.round(), suffix)
            } else {
                format!("{scaled:.1}{suffix}")
            };
        }
    }

    format!("{}ms", delta_ms.round())
}
