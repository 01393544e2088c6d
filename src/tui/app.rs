use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

use crate::models::{Note, StudentProfile, StudySession, StudyStreak, Subject, Task};
use crate::store::Store;
use crate::tui::widgets::editor::Editor;
use crate::utils::today;
use crate::Config;

/// How long a status message stays on screen
const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Tasks,
    Subjects,
    Timer,
    Notes,
    Analytics,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Dashboard,
        Tab::Tasks,
        Tab::Subjects,
        Tab::Timer,
        Tab::Notes,
        Tab::Analytics,
        Tab::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Tasks => "Tasks",
            Tab::Subjects => "Subjects",
            Tab::Timer => "Timer",
            Tab::Notes => "Notes",
            Tab::Analytics => "Analytics",
            Tab::Profile => "Profile",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    /// List tabs show a sidebar list plus a detail pane
    pub fn has_sidebar(self) -> bool {
        matches!(self, Tab::Tasks | Tab::Subjects | Tab::Notes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Form,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectField {
    Name,
    Description,
    Color,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Description,
    DueDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    Subject,
    Minutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
    Bio,
    Avatar,
    PreferredTime,
    FocusMinutes,
    BreakMinutes,
    DailyGoalHours,
    Notifications,
    Sound,
}

#[derive(Debug, Clone)]
pub struct SubjectForm {
    pub current_field: SubjectField,
    pub name: Editor,
    pub description: Editor,
    pub color: Editor,
    pub goal: Editor,
    pub editing_id: Option<String>,
}

impl SubjectForm {
    pub fn new() -> Self {
        Self {
            current_field: SubjectField::Name,
            name: Editor::new(),
            description: Editor::new(),
            color: Editor::from_text("cyan"),
            goal: Editor::from_text("0"),
            editing_id: None,
        }
    }

    pub fn from_subject(subject: &Subject) -> Self {
        Self {
            current_field: SubjectField::Name,
            name: Editor::from_text(&subject.name),
            description: Editor::from_text(subject.description.as_deref().unwrap_or("")),
            color: Editor::from_text(&subject.color),
            goal: Editor::from_text(&format!("{}", subject.goal_hours_per_week)),
            editing_id: Some(subject.id.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    pub current_field: TaskField,
    pub title: Editor,
    pub description: Editor,
    pub due_date: Editor,
    pub editing_id: Option<String>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            current_field: TaskField::Title,
            title: Editor::new(),
            description: Editor::new(),
            due_date: Editor::new(),
            editing_id: None,
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            current_field: TaskField::Title,
            title: Editor::from_text(&task.title),
            description: Editor::from_text(task.description.as_deref().unwrap_or("")),
            due_date: Editor::from_text(task.due_date.as_deref().unwrap_or("")),
            editing_id: Some(task.id.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NoteForm {
    pub current_field: NoteField,
    pub title: Editor,
    pub content: Editor,
    pub editing_id: Option<String>,
}

impl NoteForm {
    pub fn new() -> Self {
        Self {
            current_field: NoteField::Title,
            title: Editor::new(),
            content: Editor::new(),
            editing_id: None,
        }
    }

    pub fn from_note(note: &Note) -> Self {
        Self {
            current_field: NoteField::Title,
            title: Editor::from_text(&note.title),
            content: Editor::from_text(note.content.as_deref().unwrap_or("")),
            editing_id: Some(note.id.clone()),
        }
    }
}

/// Manual session entry (the timer is the usual path)
#[derive(Debug, Clone)]
pub struct SessionForm {
    pub current_field: SessionField,
    pub subject_index: usize,
    pub minutes: Editor,
}

impl SessionForm {
    pub fn new() -> Self {
        Self {
            current_field: SessionField::Subject,
            subject_index: 0,
            minutes: Editor::from_text("25"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileForm {
    pub current_field: ProfileField,
    pub name: Editor,
    pub email: Editor,
    pub bio: Editor,
    pub avatar: Editor,
    pub preferred_index: usize,
    pub focus_minutes: Editor,
    pub break_minutes: Editor,
    pub daily_goal_hours: Editor,
    pub notifications: bool,
    pub sound: bool,
}

impl ProfileForm {
    pub fn from_profile(profile: &StudentProfile) -> Self {
        use crate::models::PreferredTime;
        let preferred_index = PreferredTime::ALL
            .iter()
            .position(|t| *t == profile.preferences.preferred_time)
            .unwrap_or(0);
        Self {
            current_field: ProfileField::Name,
            name: Editor::from_text(&profile.name),
            email: Editor::from_text(&profile.email),
            bio: Editor::from_text(&profile.bio),
            avatar: Editor::from_text(&profile.avatar),
            preferred_index,
            focus_minutes: Editor::from_text(&profile.preferences.focus_minutes.to_string()),
            break_minutes: Editor::from_text(&profile.preferences.break_minutes.to_string()),
            daily_goal_hours: Editor::from_text(&profile.preferences.daily_goal_hours.to_string()),
            notifications: profile.preferences.notifications,
            sound: profile.preferences.sound,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ItemForm {
    Subject(SubjectForm),
    Task(TaskForm),
    Note(NoteForm),
    Session(SessionForm),
    Profile(ProfileForm),
}

#[derive(Debug, Clone)]
pub enum DeleteTarget {
    Subject(Subject),
    Task(Task),
    Note(Note),
}

impl DeleteTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            DeleteTarget::Subject(_) => "Subject",
            DeleteTarget::Task(_) => "Task",
            DeleteTarget::Note(_) => "Note",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DeleteTarget::Subject(s) => &s.name,
            DeleteTarget::Task(t) => &t.title,
            DeleteTarget::Note(n) => &n.title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Focus,
    Break,
}

/// Pomodoro state. Nothing here is persisted: only the committed
/// aggregate duration reaches the store when a focus block ends.
#[derive(Debug, Clone)]
pub struct TimerState {
    pub phase: TimerPhase,
    pub running_since: Option<Instant>,
    pub accumulated: Duration,
    pub subject_index: usize,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            phase: TimerPhase::Focus,
            running_since: None,
            accumulated: Duration::ZERO,
            subject_index: 0,
        }
    }
}

impl TimerState {
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + since.elapsed(),
            None => self.accumulated,
        }
    }

    fn reset(&mut self) {
        self.running_since = None;
        self.accumulated = Duration::ZERO;
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub current_tab: Tab,
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
    pub detail_scroll: u16,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tab: Tab::Dashboard,
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
            detail_scroll: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    // Core infrastructure
    pub config: Config,
    pub store: Store,

    // In-memory copies of the persisted collections, refreshed from the
    // store at defined load points
    pub subjects: Vec<Subject>,
    pub tasks: Vec<Task>,
    pub sessions: Vec<StudySession>,
    pub notes: Vec<Note>,
    pub streak: StudyStreak,
    pub profile: StudentProfile,

    // Grouped state
    pub ui: UiState,
    pub form: Option<ItemForm>,
    pub timer: TimerState,
    pub status: StatusState,
    pub delete_confirmation: Option<DeleteTarget>,
    pub delete_modal_selection: usize, // 0 = Delete, 1 = Cancel
}

impl App {
    pub fn new(config: Config, store: Store) -> Self {
        let mut app = Self {
            config,
            store,
            subjects: Vec::new(),
            tasks: Vec::new(),
            sessions: Vec::new(),
            notes: Vec::new(),
            streak: StudyStreak::default(),
            profile: StudentProfile::default(),
            ui: UiState::default(),
            form: None,
            timer: TimerState::default(),
            status: StatusState::default(),
            delete_confirmation: None,
            delete_modal_selection: 0,
        };
        app.load_data();
        app
    }

    /// Refresh every in-memory collection from the store. Reads never
    /// fail; absent or corrupt values come back as defaults.
    pub fn load_data(&mut self) {
        self.subjects = self.store.subjects();
        self.tasks = self.store.tasks();
        self.sessions = self.store.sessions();
        self.notes = self.store.notes();
        self.streak = self.store.streak();
        self.profile = self.store.profile();
        self.clamp_selection();
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    /// Auto-clear the status message after its timeout
    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed() >= STATUS_MESSAGE_TIMEOUT {
                self.status.message = None;
                self.status.message_time = None;
            }
        }
    }

    /// Length of the list shown on the current tab (0 on non-list tabs)
    pub fn current_list_len(&self) -> usize {
        match self.ui.current_tab {
            Tab::Tasks => self.tasks.len(),
            Tab::Subjects => self.subjects.len(),
            Tab::Notes => self.notes.len(),
            _ => 0,
        }
    }

    pub fn clamp_selection(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            self.ui.selected_index = 0;
            self.ui.list_state.select(None);
        } else {
            self.ui.selected_index = self.ui.selected_index.min(len - 1);
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
        }
        self.clamp_selection();
    }

    pub fn move_selection_down(&mut self) {
        let len = self.current_list_len();
        if len > 0 && self.ui.selected_index + 1 < len {
            self.ui.selected_index += 1;
        }
        self.clamp_selection();
    }

    pub fn selected_subject(&self) -> Option<&Subject> {
        self.subjects.get(self.ui.selected_index)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.ui.selected_index)
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.notes.get(self.ui.selected_index)
    }

    /// Subject names a session can be attributed to. "General" first so
    /// uncategorized time is always available.
    pub fn subject_choices(&self) -> Vec<String> {
        let mut choices = vec!["General".to_string()];
        choices.extend(self.subjects.iter().map(|s| s.name.clone()));
        choices
    }

    // Persist helpers. On write failure the in-memory copy is reloaded
    // from the store and a status message reports the failed save.

    pub fn persist_subjects(&mut self) -> bool {
        match self.store.save_subjects(&self.subjects) {
            Ok(()) => true,
            Err(e) => {
                self.subjects = self.store.subjects();
                self.clamp_selection();
                self.set_status_message(format!("Save failed: {}", e));
                false
            }
        }
    }

    pub fn persist_tasks(&mut self) -> bool {
        match self.store.save_tasks(&self.tasks) {
            Ok(()) => true,
            Err(e) => {
                self.tasks = self.store.tasks();
                self.clamp_selection();
                self.set_status_message(format!("Save failed: {}", e));
                false
            }
        }
    }

    pub fn persist_notes(&mut self) -> bool {
        match self.store.save_notes(&self.notes) {
            Ok(()) => true,
            Err(e) => {
                self.notes = self.store.notes();
                self.clamp_selection();
                self.set_status_message(format!("Save failed: {}", e));
                false
            }
        }
    }

    pub fn persist_profile(&mut self) -> bool {
        match self.store.save_profile(&self.profile) {
            Ok(()) => true,
            Err(e) => {
                self.profile = self.store.profile();
                self.set_status_message(format!("Save failed: {}", e));
                false
            }
        }
    }

    /// Record a session through the shared store path and refresh the
    /// collections it touches.
    pub fn record_session(&mut self, subject: &str, minutes: i64) -> bool {
        match self.store.record_session(subject, minutes, today()) {
            Ok(session) => {
                self.sessions = self.store.sessions();
                self.streak = self.store.streak();
                self.set_status_message(format!(
                    "Logged {} min of {} (streak: {})",
                    session.duration_minutes, session.subject, self.streak.current_streak
                ));
                true
            }
            Err(e) => {
                self.set_status_message(format!("{}", e));
                false
            }
        }
    }

    // Timer

    /// Target length of the current phase in minutes, from the profile's
    /// study preferences.
    pub fn timer_target_minutes(&self) -> u32 {
        match self.timer.phase {
            TimerPhase::Focus => self.profile.preferences.focus_minutes.max(1),
            TimerPhase::Break => self.profile.preferences.break_minutes.max(1),
        }
    }

    pub fn timer_subject(&self) -> String {
        let choices = self.subject_choices();
        choices
            .get(self.timer.subject_index)
            .cloned()
            .unwrap_or_else(|| "General".to_string())
    }

    pub fn timer_toggle(&mut self) {
        if let Some(since) = self.timer.running_since.take() {
            self.timer.accumulated += since.elapsed();
        } else {
            self.timer.running_since = Some(Instant::now());
        }
    }

    pub fn timer_reset(&mut self) {
        self.timer.reset();
        self.set_status_message("Timer reset".to_string());
    }

    pub fn timer_cycle_subject(&mut self, forward: bool) {
        let len = self.subject_choices().len();
        if len == 0 {
            return;
        }
        self.timer.subject_index = if forward {
            (self.timer.subject_index + 1) % len
        } else {
            (self.timer.subject_index + len - 1) % len
        };
    }

    /// Stop the focus timer early and commit the elapsed whole minutes.
    /// Under a minute there is nothing to record, so nothing changes.
    pub fn timer_stop_and_log(&mut self) {
        if self.timer.phase != TimerPhase::Focus {
            self.set_status_message("Breaks are not logged".to_string());
            return;
        }
        let minutes = (self.timer.elapsed().as_secs() / 60) as i64;
        if minutes < 1 {
            self.set_status_message("Less than a minute elapsed, nothing logged".to_string());
            return;
        }
        let subject = self.timer_subject();
        if self.record_session(&subject, minutes) {
            self.timer.reset();
        }
    }

    /// Called every loop iteration; completes a phase once its target
    /// elapses. A finished focus block commits its full length as a
    /// session and rolls into a (stopped) break.
    pub fn tick_timer(&mut self) {
        if !self.timer.is_running() {
            return;
        }
        let target = Duration::from_secs(self.timer_target_minutes() as u64 * 60);
        if self.timer.elapsed() < target {
            return;
        }
        match self.timer.phase {
            TimerPhase::Focus => {
                let subject = self.timer_subject();
                let minutes = self.timer_target_minutes() as i64;
                self.timer.reset();
                self.timer.phase = TimerPhase::Break;
                self.record_session(&subject, minutes);
            }
            TimerPhase::Break => {
                self.timer.reset();
                self.timer.phase = TimerPhase::Focus;
                self.set_status_message("Break over - ready for the next focus block".to_string());
            }
        }
    }
}
