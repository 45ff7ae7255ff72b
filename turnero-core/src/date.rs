//! Date and time strings as stored on records.
//!
//! Records keep `fecha` as `YYYY-MM-DD` and `hora` as `HH:MM` strings. Everything
//! here parses leniently and returns `None` instead of failing, so a malformed
//! value on one record never takes down a listing.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Parse `HH:MM`, also accepting `HH:MM:SS` as some time pickers emit it.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Combine a date and time string into a single instant.
pub fn instant(date: &str, time: &str) -> Option<NaiveDateTime> {
    Some(parse_date(date)?.and_time(parse_time(time)?))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Short numeric form used in list titles (e.g. "10/1/2025")
pub fn format_day(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

/// Human-readable label relative to `today` (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-01-10"), Some(d(2025, 1, 10)));
        assert_eq!(parse_date(" 2025-01-10 "), Some(d(2025, 1, 10)));
        assert_eq!(parse_date("10/01/2025"), None);
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_time_accepts_seconds() {
        let expected = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        assert_eq!(parse_time("14:30"), Some(expected));
        assert_eq!(parse_time("14:30:00"), Some(expected));
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time("half past two"), None);
    }

    #[test]
    fn test_instant_requires_both_parts() {
        assert!(instant("2025-01-10", "14:30").is_some());
        assert!(instant("2025-01-10", "").is_none());
        assert!(instant("soon", "14:30").is_none());
    }

    #[test]
    fn test_format_day() {
        assert_eq!(format_day(d(2025, 1, 10)), "10/1/2025");
    }

    #[test]
    fn test_day_label() {
        let today = d(2025, 2, 24);
        assert_eq!(day_label(today, today), "Today");
        assert_eq!(day_label(d(2025, 2, 25), today), "Tomorrow");
        assert_eq!(day_label(d(2025, 2, 26), today), "Wed Feb 26");
    }
}
