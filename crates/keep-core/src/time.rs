//! Timestamp formats used in archive names and log lines.
//!
//! Both are rendered in local wall-clock time at second resolution.

use chrono::{DateTime, Local};

/// Timestamp embedded in archive file names, e.g. `2024-05-01_13:45:09`.
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Timestamp written at the start of every log line, e.g. `2024-05-01 13:45:09`.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[must_use]
pub fn archive_timestamp(at: &DateTime<Local>) -> String {
    at.format(ARCHIVE_TIMESTAMP_FORMAT).to_string()
}

#[must_use]
pub fn log_timestamp(at: &DateTime<Local>) -> String {
    at.format(LOG_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn formats_are_second_resolution() {
        let at = Local
            .with_ymd_and_hms(2024, 5, 1, 13, 45, 9)
            .single()
            .expect("unambiguous local time");
        assert_eq!(archive_timestamp(&at), "2024-05-01_13:45:09");
        assert_eq!(log_timestamp(&at), "2024-05-01 13:45:09");
    }
}
