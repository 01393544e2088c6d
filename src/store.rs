use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{
    Note, StudentProfile, StudySession, StudyStreak, Subject, Task, ValidationError,
};

// Collection keys, one JSON-encoded value each. The names are part of the
// persisted data layout and must not change.
pub const SUBJECTS_KEY: &str = "subjects";
pub const TASKS_KEY: &str = "tasks";
pub const SESSIONS_KEY: &str = "studyTime";
pub const STREAK_KEY: &str = "streak";
pub const PROFILE_KEY: &str = "profile";
pub const NOTES_KEY: &str = "notes";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to create data directory: {0}")]
    Directory(String),
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Named-collection store over a single SQLite file.
///
/// Each key holds exactly one JSON-encoded value. Reads never fail to the
/// caller: a missing or unreadable value yields the caller's default.
/// Writes surface errors and are not retried. Concurrent processes are
/// not coordinated; the last write wins.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store at the given path and initialize the
    /// schema.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Directory(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let store = Store { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// In-memory store, used by tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Store { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS collections (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Read the value stored under `key`, falling back to `default` when
    /// the key is absent or its value does not deserialize. Never errors.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw: Result<String, _> = self.conn.query_row(
            "SELECT value FROM collections WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
        );
        match raw {
            Ok(text) => serde_json::from_str(&text).unwrap_or(default),
            Err(_) => default,
        }
    }

    /// Replace the value stored under `key`. A failed write leaves the
    /// previous value in place.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(value).map_err(|e| StoreError::Encode {
            key: key.to_string(),
            source: e,
        })?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO collections (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, encoded],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn subjects(&self) -> Vec<Subject> {
        self.get(SUBJECTS_KEY, Vec::new())
    }

    pub fn save_subjects(&self, subjects: &[Subject]) -> Result<(), StoreError> {
        self.set(SUBJECTS_KEY, subjects)
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.get(TASKS_KEY, Vec::new())
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<(), StoreError> {
        self.set(TASKS_KEY, tasks)
    }

    pub fn sessions(&self) -> Vec<StudySession> {
        self.get(SESSIONS_KEY, Vec::new())
    }

    pub fn save_sessions(&self, sessions: &[StudySession]) -> Result<(), StoreError> {
        self.set(SESSIONS_KEY, sessions)
    }

    pub fn notes(&self) -> Vec<Note> {
        self.get(NOTES_KEY, Vec::new())
    }

    pub fn save_notes(&self, notes: &[Note]) -> Result<(), StoreError> {
        self.set(NOTES_KEY, notes)
    }

    pub fn streak(&self) -> StudyStreak {
        self.get(STREAK_KEY, StudyStreak::default())
    }

    pub fn save_streak(&self, streak: &StudyStreak) -> Result<(), StoreError> {
        self.set(STREAK_KEY, streak)
    }

    pub fn profile(&self) -> StudentProfile {
        self.get(PROFILE_KEY, StudentProfile::default())
    }

    pub fn save_profile(&self, profile: &StudentProfile) -> Result<(), StoreError> {
        self.set(PROFILE_KEY, profile)
    }

    /// Record a completed study session: validate, append to the session
    /// log and advance the streak for `today`. Both the TUI timer and the
    /// `log` subcommand go through here.
    pub fn record_session(
        &self,
        subject: &str,
        duration_minutes: i64,
        today: NaiveDate,
    ) -> Result<StudySession, StoreError> {
        let session = StudySession::new(subject.trim().to_string(), duration_minutes);
        session.validate()?;

        let mut sessions = self.sessions();
        sessions.push(session.clone());
        self.save_sessions(&sessions)?;

        let mut streak = self.streak();
        streak.record_study_day(today);
        self.save_streak(&streak)?;

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn missing_key_yields_the_default() {
        let store = Store::open_in_memory().unwrap();
        let tasks: Vec<Task> = store.get(TASKS_KEY, Vec::new());
        assert!(tasks.is_empty());
        assert_eq!(store.get("missing", 42i64), 42);
    }

    #[test]
    fn corrupt_value_yields_the_default() {
        let store = Store::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO collections (key, value) VALUES (?1, ?2)",
                rusqlite::params![SUBJECTS_KEY, "{not json"],
            )
            .unwrap();
        assert!(store.subjects().is_empty());

        // Wrong shape is handled the same as broken syntax.
        store.set(STREAK_KEY, &["a", "b"]).unwrap();
        assert_eq!(store.streak(), StudyStreak::default());
    }

    #[test]
    fn last_write_wins() {
        let store = Store::open_in_memory().unwrap();
        store.set("k", &1i64).unwrap();
        store.set("k", &2i64).unwrap();
        assert_eq!(store.get("k", 0i64), 2);
    }

    #[test]
    fn record_session_appends_and_advances_streak() {
        let store = Store::open_in_memory().unwrap();
        let session = store.record_session("Math", 45, date("2026-03-15")).unwrap();
        assert_eq!(session.duration_minutes, 45);

        let sessions = store.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].subject, "Math");

        let streak = store.streak();
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.last_study_date, "2026-03-15");
    }

    #[test]
    fn record_session_rejects_non_positive_duration_without_persisting() {
        let store = Store::open_in_memory().unwrap();
        let result = store.record_session("Math", 0, date("2026-03-15"));
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert!(store.sessions().is_empty());
        assert_eq!(store.streak(), StudyStreak::default());
    }
}
