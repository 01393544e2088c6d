//! Derived metrics over session snapshots.
//!
//! Every function here is pure: sessions come in as a slice, the
//! reference date comes in as an argument, and nothing is read from the
//! store or the clock. Sessions whose stored timestamp fails to parse
//! are skipped rather than guessed at. The week starts on Sunday at
//! every call site.

use chrono::{Datelike, Days, NaiveDate};

use crate::models::StudySession;
use crate::utils::parse_timestamp;

/// Sunday of the week containing `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Saturday of the week containing `date`
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week(date)
        .checked_add_days(Days::new(6))
        .unwrap_or(date)
}

/// Total minutes recorded for `subject` in the week containing `today`
/// (Sunday through Saturday, both inclusive).
pub fn weekly_minutes(sessions: &[StudySession], subject: &str, today: NaiveDate) -> i64 {
    let start = start_of_week(today);
    let end = end_of_week(today);
    sessions
        .iter()
        .filter(|s| s.subject == subject)
        .filter_map(|s| s.completed_date().map(|d| (d, s.duration_minutes)))
        .filter(|(d, _)| *d >= start && *d <= end)
        .map(|(_, m)| m)
        .sum()
}

/// Weekly study time for `subject` in hours
pub fn weekly_progress_hours(sessions: &[StudySession], subject: &str, today: NaiveDate) -> f64 {
    weekly_minutes(sessions, subject, today) as f64 / 60.0
}

/// Percentage of the weekly goal reached. Not clamped: 150% is a valid
/// answer and the caller decides how to draw it. A zero or negative goal
/// reports 0% by convention.
pub fn goal_progress_percent(hours: f64, goal_hours_per_week: f64) -> f64 {
    if goal_hours_per_week <= 0.0 {
        return 0.0;
    }
    hours / goal_hours_per_week * 100.0
}

/// Difference in minutes between the two most recent sessions of a
/// subject, computed as `earlier - later` over the descending-by-time
/// pair. Zero when fewer than two sessions have usable timestamps.
pub fn trend_minutes(sessions: &[StudySession], subject: &str) -> i64 {
    let mut timed: Vec<(chrono::NaiveDateTime, i64)> = sessions
        .iter()
        .filter(|s| s.subject == subject)
        .filter_map(|s| parse_timestamp(&s.completed_at).map(|t| (t, s.duration_minutes)))
        .collect();
    if timed.len() < 2 {
        return 0;
    }
    timed.sort_by(|a, b| b.0.cmp(&a.0));
    timed[1].1 - timed[0].1
}

/// One day of the trailing histogram
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub label: String,
    pub minutes: i64,
}

/// Total minutes per day for the trailing `days`-day window ending at
/// `today`, oldest first. Days without sessions contribute a zero
/// bucket, never a hole.
pub fn daily_histogram(sessions: &[StudySession], days: u64, today: NaiveDate) -> Vec<DayBucket> {
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let minutes = sessions
                .iter()
                .filter(|s| s.completed_date() == Some(date))
                .map(|s| s.duration_minutes)
                .sum();
            DayBucket {
                date,
                label: date.format("%-m/%-d").to_string(),
                minutes,
            }
        })
        .collect()
}

/// Total minutes across all retained sessions
pub fn total_minutes(sessions: &[StudySession]) -> i64 {
    sessions.iter().map(|s| s.duration_minutes).sum()
}

/// Minutes recorded on `today` across all subjects
pub fn minutes_on(sessions: &[StudySession], date: NaiveDate) -> i64 {
    sessions
        .iter()
        .filter(|s| s.completed_date() == Some(date))
        .map(|s| s.duration_minutes)
        .sum()
}

/// Average minutes per day, always over a fixed 7-day denominator
/// regardless of how old or sparse the data is.
pub fn daily_average_minutes(sessions: &[StudySession]) -> f64 {
    total_minutes(sessions) as f64 / 7.0
}

/// For each day of the current Sunday-start week: was at least one
/// session recorded on that date?
pub fn week_study_calendar(sessions: &[StudySession], today: NaiveDate) -> [bool; 7] {
    let start = start_of_week(today);
    let mut studied = [false; 7];
    for (i, flag) in studied.iter_mut().enumerate() {
        if let Some(date) = start.checked_add_days(Days::new(i as u64)) {
            *flag = sessions.iter().any(|s| s.completed_date() == Some(date));
        }
    }
    studied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(subject: &str, minutes: i64, completed_at: &str) -> StudySession {
        StudySession {
            id: format!("s-{}-{}", subject, completed_at),
            subject: subject.to_string(),
            duration_minutes: minutes,
            completed_at: completed_at.to_string(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // 2026-03-18 is a Wednesday; its week runs Sun 03-15 .. Sat 03-21.
    const TODAY: &str = "2026-03-18";

    #[test]
    fn week_bounds_are_sunday_through_saturday() {
        assert_eq!(start_of_week(date(TODAY)), date("2026-03-15"));
        assert_eq!(end_of_week(date(TODAY)), date("2026-03-21"));
        // A Sunday is its own week start.
        assert_eq!(start_of_week(date("2026-03-15")), date("2026-03-15"));
    }

    #[test]
    fn weekly_progress_sums_only_this_week_and_subject() {
        let sessions = vec![
            session("Math", 60, "2026-03-15 08:00:00"), // Sunday, inclusive
            session("Math", 30, "2026-03-21 23:00:00"), // Saturday, inclusive
            session("Math", 45, "2026-03-14 10:00:00"), // previous week
            session("History", 90, "2026-03-17 10:00:00"), // other subject
        ];
        assert_eq!(weekly_minutes(&sessions, "Math", date(TODAY)), 90);
        let hours = weekly_progress_hours(&sessions, "Math", date(TODAY));
        assert!((hours - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn goal_percent_is_unclamped_and_zero_goal_reports_zero() {
        let pct = goal_progress_percent(6.0, 4.0);
        assert!((pct - 150.0).abs() < f64::EPSILON);
        assert_eq!(goal_progress_percent(3.0, 0.0), 0.0);
    }

    #[test]
    fn trend_subtracts_latest_from_the_session_before_it() {
        let sessions = vec![
            session("Math", 60, "2026-03-16 09:00:00"),
            session("Math", 90, "2026-03-17 09:00:00"),
        ];
        assert_eq!(trend_minutes(&sessions, "Math"), -30);
    }

    #[test]
    fn trend_is_zero_with_fewer_than_two_sessions() {
        let sessions = vec![session("Math", 60, "2026-03-16 09:00:00")];
        assert_eq!(trend_minutes(&sessions, "Math"), 0);
        assert_eq!(trend_minutes(&[], "Math"), 0);
    }

    #[test]
    fn trend_ignores_sessions_with_unreadable_timestamps() {
        let sessions = vec![
            session("Math", 60, "garbage"),
            session("Math", 90, "2026-03-17 09:00:00"),
        ];
        assert_eq!(trend_minutes(&sessions, "Math"), 0);
    }

    #[test]
    fn histogram_has_exactly_n_zero_filled_buckets_oldest_first() {
        // Two sessions on 03-14 (four days back), nothing else.
        let sessions = vec![
            session("Math", 30, "2026-03-14 09:00:00"),
            session("History", 20, "2026-03-14 20:00:00"),
        ];
        let buckets = daily_histogram(&sessions, 7, date(TODAY));
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].date, date("2026-03-12"));
        assert_eq!(buckets[6].date, date(TODAY));
        for bucket in &buckets {
            if bucket.date == date("2026-03-14") {
                assert_eq!(bucket.minutes, 50);
            } else {
                assert_eq!(bucket.minutes, 0);
            }
        }
    }

    #[test]
    fn daily_average_uses_a_fixed_seven_day_denominator() {
        let sessions = vec![
            session("Math", 70, "2026-03-01 09:00:00"),
            session("Math", 70, "2025-01-01 09:00:00"),
        ];
        let avg = daily_average_minutes(&sessions);
        assert!((avg - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn calendar_flags_days_with_sessions_in_the_current_week() {
        let sessions = vec![
            session("Math", 30, "2026-03-15 09:00:00"), // Sunday
            session("Math", 30, "2026-03-18 09:00:00"), // Wednesday
            session("Math", 30, "2026-03-08 09:00:00"), // previous Sunday
        ];
        let calendar = week_study_calendar(&sessions, date(TODAY));
        assert_eq!(calendar, [true, false, false, true, false, false, false]);
    }
}
