//! Human-relative rendering of movie creation timestamps
//!
//! Pure function of (creation time, now), so listings are deterministic
//! under an injected clock. The phrasing follows the English conventions the
//! frontend already displays: "about an hour ago", "3 days ago", and a plain
//! date once the age exceeds 73 hours.

use chrono::{DateTime, Utc};

/// Ages beyond this render as a date instead of a relative phrase
const MAX_RELATIVE_SECS: i64 = 73 * 3600;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Render `created_at` relative to `now`
pub fn format(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - created_at).num_seconds().max(0);

    if elapsed >= MAX_RELATIVE_SECS {
        return created_at.format("%Y-%m-%d").to_string();
    }

    if elapsed >= DAY {
        return match elapsed / DAY {
            1 => "one day ago".to_string(),
            n => format!("{} days ago", n),
        };
    }

    if elapsed >= HOUR {
        return match elapsed / HOUR {
            1 => "about an hour ago".to_string(),
            n => format!("{} hours ago", n),
        };
    }

    if elapsed >= MINUTE {
        return match elapsed / MINUTE {
            1 => "about a minute ago".to_string(),
            n => format!("{} minutes ago", n),
        };
    }

    match elapsed {
        0 | 1 => "about a second ago".to_string(),
        n => format!("{} seconds ago", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sixty_one_minutes_is_about_an_hour() {
        let now = fixed_now();
        let created = now - Duration::minutes(61);
        assert_eq!(format(created, now), "about an hour ago");
    }

    #[test]
    fn test_three_days() {
        let now = fixed_now();
        let created = now - Duration::days(3);
        assert_eq!(format(created, now), "3 days ago");
    }

    #[test]
    fn test_seconds_and_minutes() {
        let now = fixed_now();

        assert_eq!(format(now, now), "about a second ago");
        assert_eq!(format(now - Duration::seconds(30), now), "30 seconds ago");
        assert_eq!(format(now - Duration::seconds(61), now), "about a minute ago");
        assert_eq!(format(now - Duration::minutes(45), now), "45 minutes ago");
    }

    #[test]
    fn test_hours_and_days() {
        let now = fixed_now();

        assert_eq!(format(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(format(now - Duration::hours(25), now), "one day ago");
        assert_eq!(format(now - Duration::hours(50), now), "2 days ago");
    }

    #[test]
    fn test_old_timestamps_render_as_date() {
        let now = fixed_now();
        let created = now - Duration::hours(80);
        assert_eq!(format(created, now), "2024-05-07");
    }

    #[test]
    fn test_future_timestamps_clamp_to_now() {
        let now = fixed_now();
        let created = now + Duration::minutes(5);
        assert_eq!(format(created, now), "about a second ago");
    }

    #[test]
    fn test_monotonic_over_growing_age() {
        // Same created_at, later now never yields an "earlier" bucket
        let now = fixed_now();
        let created = now - Duration::minutes(59);

        assert_eq!(format(created, now), "59 minutes ago");
        assert_eq!(format(created, now + Duration::minutes(2)), "about an hour ago");
        assert_eq!(format(created, now + Duration::hours(2)), "2 hours ago");
    }
}
