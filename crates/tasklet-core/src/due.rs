//! Due-date parsing and display helpers.
//!
//! Due dates travel as local date-times without a timezone, formatted
//! `YYYY-MM-DDTHH:mm` (e.g. `2025-12-15T06:00`). An empty string means the
//! task has no due date. Every helper that compares against the current time
//! takes `now` explicitly so callers decide which clock to use.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Wire and storage format of a due date.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

const INVALID_DATE: &str = "Invalid date";

/// Current local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse a due-date string. Empty, padded or malformed input yields `None`.
pub fn parse_due_date(value: &str) -> Option<NaiveDateTime> {
    if value.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(value, DUE_DATE_FORMAT).ok()
}

/// `"Dec 15"`, or `"Invalid date"`.
pub fn format_month_day(value: &str) -> String {
    parse_due_date(value).map_or_else(
        || INVALID_DATE.to_string(),
        |date| date.format("%b %-d").to_string(),
    )
}

/// `"December 15, 2025"`, or `"Invalid date"`.
pub fn format_full_date(value: &str) -> String {
    parse_due_date(value).map_or_else(
        || INVALID_DATE.to_string(),
        |date| date.format("%B %-d, %Y").to_string(),
    )
}

/// `"6:00 AM"`, or an empty string.
pub fn format_time(value: &str) -> String {
    parse_due_date(value)
        .map(|date| date.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Whether the due date lies strictly before `now`.
pub fn is_overdue(value: &str, now: NaiveDateTime) -> bool {
    parse_due_date(value).is_some_and(|due| due < now)
}

/// Whether the due date falls on the same calendar day as `now`.
pub fn is_due_today(value: &str, now: NaiveDateTime) -> bool {
    parse_due_date(value).is_some_and(|due| due.date() == now.date())
}

/// Whether the due date falls on the calendar day after `now`.
pub fn is_due_tomorrow(value: &str, now: NaiveDateTime) -> bool {
    let tomorrow = now.date().succ_opt();
    parse_due_date(value).is_some_and(|due| Some(due.date()) == tomorrow)
}

/// Short label for list rows.
///
/// `"No due date"` for blank input, then `"Overdue"`, `"today"`,
/// `"tomorrow"`, and finally the month-day form.
pub fn due_date_text(value: &str, now: NaiveDateTime) -> String {
    if value.trim().is_empty() {
        return "No due date".to_string();
    }
    if is_overdue(value, now) {
        "Overdue".to_string()
    } else if is_due_today(value, now) {
        "today".to_string()
    } else if is_due_tomorrow(value, now) {
        "tomorrow".to_string()
    } else {
        format_month_day(value)
    }
}

/// Calendar days from `now` to the due date; negative when overdue.
pub fn days_until_due(value: &str, now: NaiveDateTime) -> Option<i64> {
    parse_due_date(value).map(|due| (due.date() - now.date()).num_days())
}

/// Relative label such as `"in 3 days"` or `"2 days ago"`.
pub fn relative_time_text(value: &str, now: NaiveDateTime) -> String {
    let Some(days) = days_until_due(value, now) else {
        return INVALID_DATE.to_string();
    };

    match days {
        -1 => "Yesterday".to_string(),
        d if d < 0 => format!("{} days ago", d.abs()),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        2..=7 => format!("in {days} days"),
        8..=30 => format!("in {} weeks", days / 7),
        _ => format_month_day(value),
    }
}

/// Due today or within the next three calendar days.
pub fn is_due_soon(value: &str, now: NaiveDateTime) -> bool {
    days_until_due(value, now).is_some_and(|days| (0..=3).contains(&days))
}

/// Format a date-time in the due-date format.
pub fn format_due_date(at: NaiveDateTime) -> String {
    at.format(DUE_DATE_FORMAT).to_string()
}

/// Build a due-date string from components. Out-of-range input yields `None`.
pub fn create_date_string(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .map(format_due_date)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// December 5, 2025, 12:00.
    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn parse_valid() {
        let parsed = parse_due_date("2025-12-25T10:30").unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2025, 12, 25)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn parse_invalid_and_blank() {
        assert!(parse_due_date("invalid-date").is_none());
        assert!(parse_due_date("").is_none());
        assert!(parse_due_date("   ").is_none());
        assert!(parse_due_date("2024-12-31").is_none());
    }

    #[test]
    fn parse_rejects_padding() {
        assert!(parse_due_date(" 2025-12-15T06:00").is_none());
        assert!(parse_due_date("2025-12-15T06:00 ").is_none());
        assert!(!is_overdue(" 2025-12-01T06:00", fixed_now()));
    }

    #[test]
    fn month_day_and_full_date() {
        assert_eq!(format_month_day("2025-12-25T10:30"), "Dec 25");
        assert_eq!(format_full_date("2025-12-25T10:30"), "December 25, 2025");
        assert_eq!(format_month_day("nope"), "Invalid date");
        assert_eq!(format_full_date(""), "Invalid date");
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time("2025-12-15T06:00"), "6:00 AM");
        assert_eq!(format_time("2025-12-15T18:45"), "6:45 PM");
        assert_eq!(format_time("garbage"), "");
    }

    #[test]
    fn overdue_today_tomorrow() {
        let now = fixed_now();
        assert!(is_overdue("2025-12-04T12:00", now));
        assert!(!is_overdue("2025-12-06T12:00", now));
        assert!(is_due_today("2025-12-05T10:00", now));
        assert!(!is_due_today("2025-12-06T10:00", now));
        assert!(is_due_tomorrow("2025-12-06T10:00", now));
        assert!(!is_due_tomorrow("2025-12-05T10:00", now));
        assert!(!is_overdue("", now));
    }

    #[test]
    fn due_date_text_labels() {
        let now = fixed_now();
        assert_eq!(due_date_text("", now), "No due date");
        assert_eq!(due_date_text("2025-12-04T12:00", now), "Overdue");
        // Earlier today counts as overdue.
        assert_eq!(due_date_text("2025-12-05T10:00", now), "Overdue");
        assert_eq!(due_date_text("2025-12-05T18:00", now), "today");
        assert_eq!(due_date_text("2025-12-06T10:00", now), "tomorrow");
        assert_eq!(due_date_text("2025-12-10T10:00", now), "Dec 10");
        assert_eq!(due_date_text("whenever", now), "Invalid date");
    }

    #[test]
    fn days_until() {
        let now = fixed_now();
        assert_eq!(days_until_due("2025-12-04T12:00", now), Some(-1));
        assert_eq!(days_until_due("2025-12-05T10:00", now), Some(0));
        assert_eq!(days_until_due("2025-12-06T10:00", now), Some(1));
        assert_eq!(days_until_due("bad", now), None);
    }

    #[test]
    fn relative_text() {
        let now = fixed_now();
        assert_eq!(relative_time_text("2025-12-03T12:00", now), "2 days ago");
        assert_eq!(relative_time_text("2025-12-04T12:00", now), "Yesterday");
        assert_eq!(relative_time_text("2025-12-05T10:00", now), "Today");
        assert_eq!(relative_time_text("2025-12-06T10:00", now), "Tomorrow");
        assert_eq!(relative_time_text("2025-12-08T10:00", now), "in 3 days");
        assert_eq!(relative_time_text("2025-12-20T10:00", now), "in 2 weeks");
        assert_eq!(relative_time_text("2026-01-15T10:00", now), "Jan 15");
        assert_eq!(relative_time_text("", now), "Invalid date");
    }

    #[test]
    fn due_soon_window() {
        let now = fixed_now();
        assert!(is_due_soon("2025-12-07T12:00", now));
        assert!(is_due_soon("2025-12-05T08:00", now));
        assert!(!is_due_soon("2025-12-09T12:00", now));
        assert!(!is_due_soon("2025-12-04T12:00", now));
    }

    #[test]
    fn formatting_round_trip() {
        assert_eq!(format_due_date(fixed_now()), "2025-12-05T12:00");
        assert_eq!(
            create_date_string(2025, 1, 1, 9, 30).as_deref(),
            Some("2025-01-01T09:30")
        );
        assert!(create_date_string(2025, 2, 30, 0, 0).is_none());
        assert!(create_date_string(2025, 1, 1, 24, 0).is_none());
    }
}
