//! Field-format parsing and identifier derivation
//!
//! Pure helpers shared by the resource handlers: parsing the date/time string
//! formats the API accepts, formatting them back for responses, and deriving
//! the timestamp-based identifiers used by reviews and tags.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Parse a `YYYY-MM-DD` date string. Returns None on any format error.
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

/// Parse an `HH:MM:SS` time string. Returns None on any format error.
pub fn parse_time(time_str: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time_str, "%H:%M:%S").ok()
}

/// Parse a compact `ddmmyyyy` date token as used by the review timeframe
/// query parameter. The token must be exactly eight ASCII digits and denote a
/// valid calendar date.
pub fn parse_compact_date(token: &str) -> Option<NaiveDate> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day: u32 = token[0..2].parse().ok()?;
    let month: u32 = token[2..4].parse().ok()?;
    let year: i32 = token[4..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

pub fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Derive a fresh identifier from the current UTC timestamp, together with
/// the timestamp itself (which becomes the entity's submission time).
///
/// The microsecond component makes collisions practically impossible, but
/// callers still confirm uniqueness against the store before using one.
pub fn new_identifier(prefix: &str) -> (String, NaiveDateTime) {
    let now = Utc::now().naive_utc();
    let identifier = format!("{}{}", prefix, now.format("%Y%m%d%H%M%S%6f"));
    (identifier, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        let date = parse_date("2021-02-19").unwrap();
        assert_eq!(format_date(date), "2021-02-19");
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("19-02-2021").is_none());
        assert!(parse_date("2021-13-01").is_none());
        assert!(parse_date("2021-02-30").is_none());
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_parse_time_valid() {
        let time = parse_time("01:02:03").unwrap();
        assert_eq!(format_time(time), "01:02:03");
    }

    #[test]
    fn test_parse_time_invalid() {
        assert!(parse_time("25:00:00").is_none());
        assert!(parse_time("12:60:00").is_none());
        assert!(parse_time("120").is_none());
        assert!(parse_time("12:00").is_none());
    }

    #[test]
    fn test_parse_compact_date_valid() {
        let date = parse_compact_date("19022021").unwrap();
        assert_eq!(format_date(date), "2021-02-19");
    }

    #[test]
    fn test_parse_compact_date_rejects_bad_tokens() {
        assert!(parse_compact_date("1902021").is_none()); // too short
        assert!(parse_compact_date("190220211").is_none()); // too long
        assert!(parse_compact_date("19o22021").is_none()); // non-digit
        assert!(parse_compact_date("32012021").is_none()); // day out of range
        assert!(parse_compact_date("01132021").is_none()); // month out of range
    }

    #[test]
    fn test_new_identifier_shape() {
        let (identifier, _) = new_identifier("review_");
        assert!(identifier.starts_with("review_"));
        // prefix + YYYYMMDDHHMMSS + 6 fractional digits
        assert_eq!(identifier.len(), "review_".len() + 20);
        assert!(identifier["review_".len()..].bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_new_identifier_matches_timestamp() {
        let (identifier, submitted) = new_identifier("tag_");
        let expected = format!("tag_{}", submitted.format("%Y%m%d%H%M%S%6f"));
        assert_eq!(identifier, expected);
    }
}
