use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::{current_timestamp_string, parse_date, parse_timestamp};

/// Validation failures reported before anything touches the store
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("Session duration must be positive (got {0})")]
    NonPositiveDuration(i64),
    #[error("Weekly goal hours cannot be negative (got {0})")]
    NegativeGoal(f64),
    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// A user-defined category of study with a weekly time goal.
/// Referenced from sessions by name only; the reference is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String, // opaque display token, parsed leniently at render time
    pub goal_hours_per_week: f64,
}

/// One completed block of study time attributed to a subject by name.
/// Append-only in normal flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub subject: String,
    pub duration_minutes: i64,
    pub completed_at: String, // YYYY-MM-DD HH:MM:SS
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>, // YYYY-MM-DD
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    pub updated_at: String,
}

/// Consecutive-day study counter. Singleton record, updated once per
/// recorded session by the rule in `streak.rs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudyStreak {
    pub current_streak: u32,
    pub best_streak: u32,
    #[serde(default)]
    pub last_study_date: String, // YYYY-MM-DD, empty when never studied
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredTime {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl PreferredTime {
    pub const ALL: [PreferredTime; 4] = [
        PreferredTime::Morning,
        PreferredTime::Afternoon,
        PreferredTime::Evening,
        PreferredTime::Night,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PreferredTime::Morning => "Morning",
            PreferredTime::Afternoon => "Afternoon",
            PreferredTime::Evening => "Evening",
            PreferredTime::Night => "Night",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudyPreferences {
    pub preferred_time: PreferredTime,
    pub focus_minutes: u32,
    pub break_minutes: u32,
    pub daily_goal_hours: f64,
    pub notifications: bool,
    pub sound: bool,
}

impl Default for StudyPreferences {
    fn default() -> Self {
        Self {
            preferred_time: PreferredTime::Evening,
            focus_minutes: 25,
            break_minutes: 5,
            daily_goal_hours: 2.0,
            notifications: true,
            sound: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub title: String,
    pub description: String,
}

/// Singleton profile record: identity fields plus nested study
/// preferences and earned achievements.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar: String, // URL or data string, may be empty
    #[serde(default)]
    pub preferences: StudyPreferences,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Subject {
    pub fn new(name: String) -> Self {
        Self {
            id: new_id(),
            name,
            description: None,
            color: "cyan".to_string(),
            goal_hours_per_week: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("Subject name"));
        }
        if self.goal_hours_per_week < 0.0 {
            return Err(ValidationError::NegativeGoal(self.goal_hours_per_week));
        }
        Ok(())
    }
}

impl StudySession {
    pub fn new(subject: String, duration_minutes: i64) -> Self {
        Self {
            id: new_id(),
            subject,
            duration_minutes,
            completed_at: current_timestamp_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.subject.trim().is_empty() {
            return Err(ValidationError::EmptyField("Session subject"));
        }
        if self.duration_minutes <= 0 {
            return Err(ValidationError::NonPositiveDuration(self.duration_minutes));
        }
        Ok(())
    }

    /// Calendar date the session completed on, or None when the stored
    /// timestamp does not parse. Metrics skip such sessions.
    pub fn completed_date(&self) -> Option<chrono::NaiveDate> {
        parse_timestamp(&self.completed_at).map(|dt| dt.date())
    }
}

impl Task {
    pub fn new(title: String) -> Self {
        Self {
            id: new_id(),
            title,
            description: None,
            due_date: None,
            completed: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("Task title"));
        }
        if let Some(ref due) = self.due_date {
            if !due.trim().is_empty() && parse_date(due).is_err() {
                return Err(ValidationError::InvalidDate(due.clone()));
            }
        }
        Ok(())
    }
}

impl Note {
    pub fn new(title: String) -> Self {
        Self {
            id: new_id(),
            title,
            content: None,
            updated_at: current_timestamp_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("Note title"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_with_zero_duration_is_rejected() {
        let session = StudySession::new("Math".to_string(), 0);
        assert!(matches!(
            session.validate(),
            Err(ValidationError::NonPositiveDuration(0))
        ));
    }

    #[test]
    fn session_with_negative_duration_is_rejected() {
        let session = StudySession::new("Math".to_string(), -15);
        assert!(session.validate().is_err());
    }

    #[test]
    fn session_with_blank_subject_is_rejected() {
        let session = StudySession::new("   ".to_string(), 30);
        assert!(matches!(
            session.validate(),
            Err(ValidationError::EmptyField(_))
        ));
    }

    #[test]
    fn subject_with_negative_goal_is_rejected() {
        let mut subject = Subject::new("Physics".to_string());
        subject.goal_hours_per_week = -1.0;
        assert!(subject.validate().is_err());
    }

    #[test]
    fn subject_ids_are_unique() {
        let a = Subject::new("A".to_string());
        let b = Subject::new("A".to_string());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn task_with_malformed_due_date_is_rejected() {
        let mut task = Task::new("Essay".to_string());
        task.due_date = Some("next tuesday".to_string());
        assert!(matches!(
            task.validate(),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn profile_deserializes_from_partial_json() {
        // Older persisted profiles may miss newer fields; defaults fill in.
        let profile: StudentProfile = serde_json::from_str(r#"{"name":"Sam"}"#).unwrap();
        assert_eq!(profile.name, "Sam");
        assert_eq!(profile.preferences.focus_minutes, 25);
        assert!(profile.achievements.is_empty());
    }
}
