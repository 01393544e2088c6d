use chrono::NaiveDate;

use crate::models::StudyStreak;
use crate::utils::parse_date;

impl StudyStreak {
    /// Advance the streak for a session completed on `today`.
    ///
    /// Day difference is measured between calendar dates; two sessions on
    /// the same day each count, since the counter tracks recorded
    /// sessions rather than distinct days. A gap of more than one day
    /// resets the run to 1 without touching the best count. A missing or
    /// unreadable last-study date behaves like a gap.
    pub fn record_study_day(&mut self, today: NaiveDate) {
        let continues = match parse_date(&self.last_study_date) {
            Ok(last) => (today - last).num_days() <= 1,
            Err(_) => false,
        };

        if continues {
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 1;
        }
        self.last_study_date = today.format("%Y-%m-%d").to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn gap_of_two_days_resets_to_one_without_raising_best() {
        let mut streak = StudyStreak {
            current_streak: 0,
            best_streak: 0,
            last_study_date: "2026-03-13".to_string(),
        };
        streak.record_study_day(date("2026-03-15"));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.best_streak, 0);
        assert_eq!(streak.last_study_date, "2026-03-15");
    }

    #[test]
    fn next_day_session_extends_and_raises_best() {
        let mut streak = StudyStreak {
            current_streak: 1,
            best_streak: 0,
            last_study_date: "2026-03-15".to_string(),
        };
        streak.record_study_day(date("2026-03-16"));
        assert_eq!(streak.current_streak, 2);
        assert_eq!(streak.best_streak, 2);
        assert_eq!(streak.last_study_date, "2026-03-16");
    }

    #[test]
    fn same_day_sessions_each_increment() {
        let mut streak = StudyStreak {
            current_streak: 3,
            best_streak: 5,
            last_study_date: "2026-03-16".to_string(),
        };
        streak.record_study_day(date("2026-03-16"));
        assert_eq!(streak.current_streak, 4);
        assert_eq!(streak.best_streak, 5);
    }

    #[test]
    fn first_ever_session_takes_the_reset_branch() {
        let mut streak = StudyStreak::default();
        assert!(streak.last_study_date.is_empty());
        streak.record_study_day(date("2026-03-15"));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.best_streak, 0);
    }

    #[test]
    fn long_gap_preserves_best() {
        let mut streak = StudyStreak {
            current_streak: 7,
            best_streak: 9,
            last_study_date: "2026-02-01".to_string(),
        };
        streak.record_study_day(date("2026-03-15"));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.best_streak, 9);
    }
}
