//! Shared text and time helpers.

use chrono::{DateTime, Utc};

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formats a timestamp as a calendar date.
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Converts a unix timestamp in seconds, falling back to the epoch when out of range.
pub fn from_unix_seconds(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Collapses line breaks so a message fits on a single line.
pub fn flatten_lines(input: &str) -> String {
    input.replace("\r\n", " ").replace('\n', " ")
}

/// Builds the channel name for a support ticket: lowercase and at most 90 characters.
pub fn ticket_channel_name(prefix: &str, member_name: &str) -> String {
    format!("{prefix}{member_name}")
        .to_lowercase()
        .chars()
        .take(90)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_format_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(timestamp), "2024-01-01 12:00:00");
        assert_eq!(format_date(timestamp), "2024-01-01");
    }

    #[test]
    fn test_from_unix_seconds() {
        assert_eq!(
            from_unix_seconds(1_704_110_400),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(from_unix_seconds(i64::MAX), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_flatten_lines() {
        assert_eq!(flatten_lines("one\ntwo\r\nthree"), "one two three");
    }

    #[test]
    fn test_ticket_channel_name() {
        assert_eq!(ticket_channel_name("ticket-", "Moana"), "ticket-moana");

        let long_name = "x".repeat(200);
        assert_eq!(ticket_channel_name("ticket-", &long_name).chars().count(), 90);
    }

    proptest! {
        #[test]
        fn test_property_ticket_channel_name_bounded(name in r"[a-zA-Z0-9_.]{2,120}") {
            let channel = ticket_channel_name("ticket-", &name);
            prop_assert!(channel.chars().count() <= 90);
            prop_assert_eq!(channel.clone(), channel.to_lowercase());
        }
    }
}
