use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

const LONG_FORMAT: &str = "%A, %B %-d, %Y %H:%M";
const SHORT_FORMAT: &str = "%b %-d, %Y";

/// Long form such as `Monday, January 15, 2024 10:30`, in the offset the
/// date was written with. Unparseable input comes back unchanged.
pub fn format_display_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => dt.format(LONG_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Compact form for list rows (`Jan 15, 2024`), same fallback rules.
pub fn format_short_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => dt.format(SHORT_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

pub fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(n) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(n.and_utc().fixed_offset());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|n| n.and_utc().fixed_offset());
    }

    // Header dates in the wild: "(UTC)" comments, missing weekday, odd spacing.
    // Needs at least day, month and year tokens to be worth trying.
    let looks_like_header_date =
        s.split_whitespace().count() >= 3 && s.chars().any(|c| c.is_ascii_digit());
    if looks_like_header_date {
        return mailparse::dateparse(s)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.fixed_offset());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_timestamp_renders_long_form() {
        let out = format_display_date("2024-01-15T10:30:00Z");
        assert_eq!(out, "Monday, January 15, 2024 10:30");
        assert!(out.contains("Monday"));
        assert!(out.contains("January"));
        assert!(out.contains("15"));
        assert!(out.contains("2024"));
    }

    #[test]
    fn header_date_keeps_its_offset() {
        assert_eq!(
            format_display_date("Fri, 02 Feb 2024 18:05:09 -0500"),
            "Friday, February 2, 2024 18:05"
        );
    }

    #[test]
    fn header_date_with_comment_is_parsed() {
        let out = format_display_date("Mon, 15 Jan 2024 10:30:00 +0000 (UTC)");
        assert!(out.starts_with("Monday, January 15, 2024"), "{out}");
    }

    #[test]
    fn naive_forms_are_treated_as_utc() {
        assert_eq!(
            format_display_date("2024-03-01 08:00:00"),
            "Friday, March 1, 2024 08:00"
        );
        assert_eq!(format_short_date("2024-03-01"), "Mar 1, 2024");
    }

    #[test]
    fn garbage_passes_through() {
        for raw in ["not-a-date", "", "   ", "12345", "2024-13-45", "<>", "31 Foo"] {
            assert_eq!(format_display_date(raw), raw);
            assert_eq!(format_short_date(raw), raw);
        }
    }
}
