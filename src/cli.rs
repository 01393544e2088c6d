use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::metrics;
use crate::models::{Note, Task, ValidationError};
use crate::store::{Store, StoreError};
use crate::utils::{parse_date, today};

#[derive(Parser)]
#[command(name = "studytrack")]
#[command(about = "Study tracker - subjects, sessions, streaks and a pomodoro timer")]
#[command(version)]
pub struct Cli {
    /// Use development mode (uses separate dev config/data file)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Quickly add a new task
    AddTask {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Task description
        #[arg(long)]
        description: Option<String>,
    },
    /// Quickly add a new note
    AddNote {
        /// Note title
        title: String,
        /// Note content
        #[arg(long)]
        content: Option<String>,
    },
    /// Record a completed study session
    Log {
        /// Subject name (use "General" for uncategorized time)
        subject: String,
        /// Duration in minutes
        minutes: i64,
    },
    /// Print this week's study summary
    Stats,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
    #[error("{0}")]
    ValidationError(#[from] ValidationError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
}

/// Handle the add-task command
pub fn handle_add_task(
    title: String,
    due: Option<String>,
    description: Option<String>,
    store: &Store,
) -> Result<(), CliError> {
    if let Some(ref due_str) = due {
        parse_date(due_str).map_err(|e| {
            CliError::DateParseError(format!("Invalid date format '{}': {}", due_str, e))
        })?;
    }

    let mut task = Task::new(title);
    task.due_date = due;
    task.description = description;
    task.validate()?;

    let mut tasks = store.tasks();
    tasks.push(task.clone());
    store.save_tasks(&tasks)?;
    println!("Task created successfully (id: {})", task.id);

    Ok(())
}

/// Handle the add-note command
pub fn handle_add_note(title: String, content: Option<String>, store: &Store) -> Result<(), CliError> {
    let mut note = Note::new(title);
    note.content = content;
    note.validate()?;

    let mut notes = store.notes();
    notes.push(note.clone());
    store.save_notes(&notes)?;
    println!("Note created successfully (id: {})", note.id);

    Ok(())
}

/// Handle the log command: record a session and advance the streak
pub fn handle_log(subject: String, minutes: i64, store: &Store) -> Result<(), CliError> {
    let session = store.record_session(&subject, minutes, today())?;
    let streak = store.streak();
    println!(
        "Logged {} min of {} (streak: {} day{})",
        session.duration_minutes,
        session.subject,
        streak.current_streak,
        if streak.current_streak == 1 { "" } else { "s" },
    );

    Ok(())
}

/// Handle the stats command: weekly summary over all subjects
pub fn handle_stats(store: &Store) -> Result<(), CliError> {
    let sessions = store.sessions();
    let subjects = store.subjects();
    let streak = store.streak();
    let now = today();

    println!(
        "Week of {} - {}",
        metrics::start_of_week(now).format("%Y-%m-%d"),
        metrics::end_of_week(now).format("%Y-%m-%d"),
    );

    if subjects.is_empty() {
        println!("No subjects yet. Add one in the TUI or log time against \"General\".");
    }

    for subject in &subjects {
        let hours = metrics::weekly_progress_hours(&sessions, &subject.name, now);
        let percent = metrics::goal_progress_percent(hours, subject.goal_hours_per_week);
        println!(
            "  {:<20} {:>5.1}h / {:.1}h  ({:.0}%)",
            subject.name, hours, subject.goal_hours_per_week, percent,
        );
    }

    let total = metrics::total_minutes(&sessions);
    println!("Total recorded: {}h {}m", total / 60, total % 60);
    println!(
        "Daily average:  {:.0} min",
        metrics::daily_average_minutes(&sessions)
    );
    println!(
        "Streak:         {} (best {})",
        streak.current_streak, streak.best_streak
    );

    Ok(())
}
