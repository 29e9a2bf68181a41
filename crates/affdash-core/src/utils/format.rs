//! Display helpers for dates, money and long text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Shown when a date is absent.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown when a date cannot be parsed.
pub const INVALID_DATE: &str = "Invalid date";

/// Parse the timestamp shapes the backend emits: RFC 3339, naive
/// `YYYY-MM-DDTHH:MM:SS[.f]`, or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Long date with time, e.g. `June 5, 2024 at 02:30 PM` (UTC).
pub fn format_date(date: Option<&str>) -> String {
    match date.filter(|d| !d.trim().is_empty()) {
        None => NOT_AVAILABLE.to_string(),
        Some(date) => parse_timestamp(date)
            .map(|dt| dt.format("%B %-d, %Y at %I:%M %p").to_string())
            .unwrap_or_else(|| INVALID_DATE.to_string()),
    }
}

/// Short date without time, e.g. `Jun 5, 2024`.
pub fn format_short_date(date: Option<&str>) -> String {
    match date.filter(|d| !d.trim().is_empty()) {
        None => NOT_AVAILABLE.to_string(),
        Some(date) => parse_timestamp(date)
            .map(|dt| dt.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| INVALID_DATE.to_string()),
    }
}

/// Elapsed time between `start` and `end` (default: now) in its largest
/// whole unit, e.g. `3 days ago`. Returns `Unknown` if either side is invalid.
pub fn time_difference(start: &str, end: Option<&str>) -> String {
    let Some(start) = parse_timestamp(start) else {
        return "Unknown".to_string();
    };
    let end = match end {
        Some(end) => match parse_timestamp(end) {
            Some(end) => end,
            None => return "Unknown".to_string(),
        },
        None => Utc::now(),
    };

    let secs = (end - start).num_seconds().unsigned_abs();
    let (mins, hours, days) = (secs / 60, secs / 3600, secs / 86_400);

    let plural = |n: u64, unit: &str| {
        format!("{} {}{} ago", n, unit, if n == 1 { "" } else { "s" })
    };
    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if mins > 0 {
        plural(mins, "minute")
    } else {
        "Just now".to_string()
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// US dollar amount with thousands separators, e.g. `$1,234.50`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, c) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(
            format_date(Some("2024-06-05T14:30:00Z")),
            "June 5, 2024 at 02:30 PM"
        );
        assert_eq!(format_date(Some("2024-06-05")), "June 5, 2024 at 12:00 AM");
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("")), "N/A");
        assert_eq!(format_date(Some("yesterday")), "Invalid date");
    }

    #[test]
    fn test_format_short_date() {
        assert_eq!(format_short_date(Some("2024-06-05T14:30:00.123+02:00")), "Jun 5, 2024");
        assert_eq!(format_short_date(Some("2024-12-31T23:59:59")), "Dec 31, 2024");
        assert_eq!(format_short_date(Some("31/12/2024")), "Invalid date");
    }

    #[test]
    fn test_time_difference() {
        let start = "2024-06-01T00:00:00Z";
        assert_eq!(time_difference(start, Some("2024-06-04T05:00:00Z")), "3 days ago");
        assert_eq!(time_difference(start, Some("2024-06-01T01:59:00Z")), "1 hour ago");
        assert_eq!(time_difference(start, Some("2024-06-01T00:05:00Z")), "5 minutes ago");
        assert_eq!(time_difference(start, Some("2024-06-01T00:00:30Z")), "Just now");
        // Order does not matter
        assert_eq!(time_difference("2024-06-02T00:00:00Z", Some(start)), "1 day ago");
        assert_eq!(time_difference("garbage", None), "Unknown");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("héllo wörld", 7), "héll...");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(1234.567), "$1,234.57");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-42.1), "-$42.10");
        assert_eq!(format_currency(f64::NAN), "$0.00");
    }
}
