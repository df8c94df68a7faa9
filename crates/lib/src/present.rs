//! Display formatting for list rows and message bubbles. Nothing here mutates state.

use chrono::{DateTime, Local, Utc};
use std::borrow::Cow;

/// Human-friendly age of a timestamp relative to `now`.
///
/// Whole hours elapsed: under 1 is "Just now", under 24 is "<N>h ago", under 48 is
/// "Yesterday", anything older is the local calendar date.
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - then).num_hours();
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if hours < 48 {
        "Yesterday".to_string()
    } else {
        calendar_date(then)
    }
}

/// Local date as M/D/YYYY.
pub fn calendar_date(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%-m/%-d/%Y").to_string()
}

/// Local HH:MM for a message timestamp.
pub fn message_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}

/// Shorten a description to `max` characters plus "..." for list display.
pub fn truncate_description(description: &str, max: usize) -> Cow<'_, str> {
    match description.char_indices().nth(max) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &description[..cut])),
        None => Cow::Borrowed(description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn relative_age_buckets() {
        let now = Utc::now();
        assert_eq!(relative_age(now - Duration::minutes(30), now), "Just now");
        assert_eq!(relative_age(now - Duration::hours(5), now), "5h ago");
        assert_eq!(relative_age(now - Duration::hours(30), now), "Yesterday");

        let old = now - Duration::hours(72);
        let rendered = relative_age(old, now);
        assert_eq!(rendered, calendar_date(old));
        assert_eq!(rendered.matches('/').count(), 2);
    }

    #[test]
    fn relative_age_boundaries() {
        let now = Utc::now();
        assert_eq!(relative_age(now, now), "Just now");
        assert_eq!(relative_age(now - Duration::hours(1), now), "1h ago");
        assert_eq!(relative_age(now - Duration::hours(23), now), "23h ago");
        assert_eq!(relative_age(now - Duration::hours(24), now), "Yesterday");
        assert_ne!(relative_age(now - Duration::hours(48), now), "Yesterday");
        // Clock skew: a timestamp slightly in the future still reads as recent.
        assert_eq!(relative_age(now + Duration::minutes(5), now), "Just now");
    }

    #[test]
    fn truncates_long_description_only_for_display() {
        let stored = "a".repeat(40);
        let shown = truncate_description(&stored, 30);
        assert_eq!(shown, format!("{}...", "a".repeat(30)));
        assert_eq!(stored.len(), 40);
    }

    #[test]
    fn short_description_untouched() {
        let exact = "b".repeat(30);
        assert!(matches!(truncate_description(&exact, 30), Cow::Borrowed(_)));
        assert_eq!(truncate_description("short", 30), "short");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(35);
        let shown = truncate_description(&text, 30);
        assert_eq!(shown.chars().count(), 33);
    }

    #[test]
    fn message_time_is_hours_and_minutes() {
        let t = message_time(Utc::now());
        assert_eq!(t.len(), 5);
        assert_eq!(&t[2..3], ":");
    }
}
