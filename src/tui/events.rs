use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;

use crate::models::{Note, PreferredTime, Subject, Task};
use crate::tui::app::{
    App, DeleteTarget, ItemForm, Mode, NoteField, NoteForm, ProfileField, ProfileForm,
    SessionField, SessionForm, SubjectField, SubjectForm, Tab, TaskField, TaskForm,
};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::widgets::detail::note_markdown;
use crate::tui::widgets::editor::Editor;
use crate::utils::{current_timestamp_string, has_primary_modifier, parse_key_binding};

/// Guard that ensures terminal state is restored even on panic.
/// A TUI that leaves the terminal in raw mode or the alternate screen
/// makes the user's shell unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Manually restore terminal state (called on normal exit).
    /// After this the guard does nothing on drop.
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Ignore errors here, this is already a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering the alternate screen so the
    // error lands in the normal terminal.
    let (width, height) = terminal_size().map_err(TuiError::IoError)?;

    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;

    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, minimum required: {}x{}.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.check_status_message_timeout();

        // The poll below doubles as the cooperative timer tick
        app.tick_timer();

        let terminal_size = terminal.size()?;
        let terminal_rect =
            ratatui::layout::Rect::new(0, 0, terminal_size.width, terminal_size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(
                terminal_rect,
                app.ui.current_tab.has_sidebar() && app.ui.mode != Mode::Form,
            );
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key_event) => {
                    // Only process Press events to avoid double-processing
                    // on Windows
                    if key_event.kind == KeyEventKind::Press {
                        if handle_key_event(&mut app, key_event)? {
                            break; // Quit requested
                        }
                    }
                }
                Event::Resize(_, _) => {
                    // Layout recalculates from terminal.size() on the next
                    // draw
                }
                _ => {}
            }
        }
    }

    guard.restore()?;

    Ok(())
}

fn matches_binding(key_event: KeyEvent, binding: &str) -> bool {
    match parse_key_binding(binding) {
        Ok(parsed) => {
            key_event.code == parsed.key_code
                && parsed.requires_ctrl == has_primary_modifier(key_event.modifiers)
        }
        Err(_) => false,
    }
}

fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    // Delete confirmation modal swallows everything while open
    if app.delete_confirmation.is_some() {
        handle_delete_confirmation(app, key_event);
        return Ok(false);
    }

    match app.ui.mode {
        Mode::Help => {
            let help_binding = app.config.key_bindings.help.clone();
            if key_event.code == KeyCode::Esc || matches_binding(key_event, &help_binding) {
                app.ui.mode = Mode::View;
            }
            Ok(false)
        }
        Mode::Form => {
            handle_form_keys(app, key_event);
            Ok(false)
        }
        Mode::View => handle_view_keys(app, key_event),
    }
}

fn handle_delete_confirmation(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Up | KeyCode::Down => {
            app.delete_modal_selection = 1 - app.delete_modal_selection;
        }
        KeyCode::Esc => {
            app.delete_confirmation = None;
        }
        KeyCode::Enter => {
            let target = app.delete_confirmation.take();
            if app.delete_modal_selection != 0 {
                return; // Cancel
            }
            match target {
                Some(DeleteTarget::Subject(subject)) => {
                    // Sessions keep their subject name; deletion does not
                    // cascade into the session log.
                    app.subjects.retain(|s| s.id != subject.id);
                    if app.persist_subjects() {
                        app.set_status_message(format!("Subject '{}' deleted", subject.name));
                    }
                }
                Some(DeleteTarget::Task(task)) => {
                    app.tasks.retain(|t| t.id != task.id);
                    if app.persist_tasks() {
                        app.set_status_message("Task deleted".to_string());
                    }
                }
                Some(DeleteTarget::Note(note)) => {
                    app.notes.retain(|n| n.id != note.id);
                    if app.persist_notes() {
                        app.set_status_message("Note deleted".to_string());
                    }
                }
                None => {}
            }
            app.clamp_selection();
        }
        _ => {}
    }
}

fn handle_view_keys(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if matches_binding(key_event, &kb.quit) {
        return Ok(true);
    }
    if matches_binding(key_event, &kb.help) {
        app.ui.mode = Mode::Help;
        return Ok(false);
    }
    if matches_binding(key_event, &kb.tab_left) {
        app.ui.current_tab = app.ui.current_tab.prev();
        app.ui.selected_index = 0;
        app.ui.detail_scroll = 0;
        app.clamp_selection();
        return Ok(false);
    }
    if matches_binding(key_event, &kb.tab_right) {
        app.ui.current_tab = app.ui.current_tab.next();
        app.ui.selected_index = 0;
        app.ui.detail_scroll = 0;
        app.clamp_selection();
        return Ok(false);
    }
    if let KeyCode::Char(c) = key_event.code {
        if let Some(digit) = c.to_digit(10) {
            let idx = digit as usize;
            if (1..=Tab::ALL.len()).contains(&idx) {
                app.ui.current_tab = Tab::ALL[idx - 1];
                app.ui.selected_index = 0;
                app.ui.detail_scroll = 0;
                app.clamp_selection();
                return Ok(false);
            }
        }
    }

    match app.ui.current_tab {
        Tab::Timer => {
            if matches_binding(key_event, &kb.timer_toggle) {
                app.timer_toggle();
            } else if matches_binding(key_event, &kb.select) {
                app.timer_stop_and_log();
            } else if matches_binding(key_event, &kb.timer_reset) {
                app.timer_reset();
            } else if matches_binding(key_event, &kb.list_up) {
                app.timer_cycle_subject(false);
            } else if matches_binding(key_event, &kb.list_down) {
                app.timer_cycle_subject(true);
            }
        }
        Tab::Dashboard | Tab::Analytics => {
            if matches_binding(key_event, &kb.new) {
                app.form = Some(ItemForm::Session(SessionForm::new()));
                app.ui.mode = Mode::Form;
            }
        }
        Tab::Profile => {
            if matches_binding(key_event, &kb.edit) {
                app.form = Some(ItemForm::Profile(ProfileForm::from_profile(&app.profile)));
                app.ui.mode = Mode::Form;
            }
        }
        Tab::Tasks | Tab::Subjects | Tab::Notes => {
            handle_list_tab_keys(app, key_event, &kb);
        }
    }

    Ok(false)
}

fn handle_list_tab_keys(app: &mut App, key_event: KeyEvent, kb: &crate::config::KeyBindings) {
    if matches_binding(key_event, &kb.list_up) {
        app.move_selection_up();
        app.ui.detail_scroll = 0;
        return;
    }
    if matches_binding(key_event, &kb.list_down) {
        app.move_selection_down();
        app.ui.detail_scroll = 0;
        return;
    }
    match key_event.code {
        KeyCode::PageUp => {
            app.ui.detail_scroll = app.ui.detail_scroll.saturating_sub(5);
            return;
        }
        KeyCode::PageDown => {
            app.ui.detail_scroll = app.ui.detail_scroll.saturating_add(5);
            return;
        }
        _ => {}
    }

    if matches_binding(key_event, &kb.new) {
        app.form = Some(match app.ui.current_tab {
            Tab::Tasks => ItemForm::Task(TaskForm::new()),
            Tab::Subjects => ItemForm::Subject(SubjectForm::new()),
            _ => ItemForm::Note(NoteForm::new()),
        });
        app.ui.mode = Mode::Form;
        return;
    }
    if matches_binding(key_event, &kb.edit) {
        let form = match app.ui.current_tab {
            Tab::Tasks => app.selected_task().map(|t| ItemForm::Task(TaskForm::from_task(t))),
            Tab::Subjects => app
                .selected_subject()
                .map(|s| ItemForm::Subject(SubjectForm::from_subject(s))),
            _ => app.selected_note().map(|n| ItemForm::Note(NoteForm::from_note(n))),
        };
        if let Some(form) = form {
            app.form = Some(form);
            app.ui.mode = Mode::Form;
        }
        return;
    }
    if matches_binding(key_event, &kb.delete) {
        let target = match app.ui.current_tab {
            Tab::Tasks => app.selected_task().cloned().map(DeleteTarget::Task),
            Tab::Subjects => app.selected_subject().cloned().map(DeleteTarget::Subject),
            _ => app.selected_note().cloned().map(DeleteTarget::Note),
        };
        if let Some(target) = target {
            app.delete_confirmation = Some(target);
            app.delete_modal_selection = 0;
        }
        return;
    }
    if app.ui.current_tab == Tab::Tasks && matches_binding(key_event, &kb.toggle_task_status) {
        if let Some(index) = app.ui.list_state.selected() {
            if let Some(task) = app.tasks.get_mut(index) {
                task.completed = !task.completed;
                let done = task.completed;
                if app.persist_tasks() {
                    app.set_status_message(
                        if done { "Task done" } else { "Task reopened" }.to_string(),
                    );
                }
            }
        }
        return;
    }
    if app.ui.current_tab == Tab::Notes
        && has_primary_modifier(key_event.modifiers)
        && matches!(key_event.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        if let Some(note) = app.selected_note() {
            let content = note_markdown(note);
            match arboard::Clipboard::new() {
                Ok(mut clipboard) => {
                    if let Err(e) = clipboard.set_text(&content) {
                        app.set_status_message(format!("Failed to copy to clipboard: {}", e));
                    } else {
                        app.set_status_message("Note copied to clipboard".to_string());
                    }
                }
                Err(_) => {
                    app.set_status_message("Failed to access clipboard".to_string());
                }
            }
        }
    }
}

// Form handling

fn handle_form_keys(app: &mut App, key_event: KeyEvent) {
    let kb = app.config.key_bindings.clone();

    if key_event.code == KeyCode::Esc {
        app.form = None;
        app.ui.mode = Mode::View;
        return;
    }
    if matches_binding(key_event, &kb.save) {
        submit_form(app);
        return;
    }

    let subject_choice_count = app.subject_choices().len();
    let Some(ref mut form) = app.form else {
        return;
    };

    match key_event.code {
        KeyCode::Tab => {
            cycle_field(form, true);
            return;
        }
        KeyCode::BackTab => {
            cycle_field(form, false);
            return;
        }
        _ => {}
    }

    // Choice and toggle fields react to Left/Right
    if handle_choice_keys(form, key_event, subject_choice_count) {
        return;
    }

    let multiline = is_multiline_active(form);
    if let Some(editor) = active_editor(form) {
        match key_event.code {
            KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => {
                editor.insert_char(c)
            }
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Delete => editor.delete(),
            KeyCode::Left => editor.move_left(),
            KeyCode::Right => editor.move_right(),
            KeyCode::Home => editor.move_home(),
            KeyCode::End => editor.move_end(),
            KeyCode::Enter => {
                if multiline {
                    editor.insert_newline();
                } else {
                    cycle_field(form, true);
                }
            }
            KeyCode::Up => {
                if multiline {
                    editor.move_up();
                } else {
                    cycle_field(form, false);
                }
            }
            KeyCode::Down => {
                if multiline {
                    editor.move_down();
                } else {
                    cycle_field(form, true);
                }
            }
            _ => {}
        }
    } else {
        // Choice field: Enter/Up/Down still navigate
        match key_event.code {
            KeyCode::Enter | KeyCode::Down => cycle_field(form, true),
            KeyCode::Up => cycle_field(form, false),
            _ => {}
        }
    }
}

fn cycle_field(form: &mut ItemForm, forward: bool) {
    match form {
        ItemForm::Subject(f) => {
            const ORDER: [SubjectField; 4] = [
                SubjectField::Name,
                SubjectField::Description,
                SubjectField::Color,
                SubjectField::Goal,
            ];
            f.current_field = cycled(&ORDER, f.current_field, forward);
        }
        ItemForm::Task(f) => {
            const ORDER: [TaskField; 3] = [TaskField::Title, TaskField::DueDate, TaskField::Description];
            f.current_field = cycled(&ORDER, f.current_field, forward);
        }
        ItemForm::Note(f) => {
            const ORDER: [NoteField; 2] = [NoteField::Title, NoteField::Content];
            f.current_field = cycled(&ORDER, f.current_field, forward);
        }
        ItemForm::Session(f) => {
            const ORDER: [SessionField; 2] = [SessionField::Subject, SessionField::Minutes];
            f.current_field = cycled(&ORDER, f.current_field, forward);
        }
        ItemForm::Profile(f) => {
            const ORDER: [ProfileField; 10] = [
                ProfileField::Name,
                ProfileField::Email,
                ProfileField::Bio,
                ProfileField::Avatar,
                ProfileField::PreferredTime,
                ProfileField::FocusMinutes,
                ProfileField::BreakMinutes,
                ProfileField::DailyGoalHours,
                ProfileField::Notifications,
                ProfileField::Sound,
            ];
            f.current_field = cycled(&ORDER, f.current_field, forward);
        }
    }
}

fn cycled<T: Copy + PartialEq>(order: &[T], current: T, forward: bool) -> T {
    let idx = order.iter().position(|x| *x == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % order.len()
    } else {
        (idx + order.len() - 1) % order.len()
    };
    order[next]
}

/// Left/Right on a choice or toggle field. Returns true when handled.
fn handle_choice_keys(form: &mut ItemForm, key_event: KeyEvent, subject_choices: usize) -> bool {
    let step = match key_event.code {
        KeyCode::Left => -1i32,
        KeyCode::Right => 1i32,
        _ => return false,
    };

    match form {
        ItemForm::Session(f) if f.current_field == SessionField::Subject => {
            if subject_choices > 0 {
                let len = subject_choices as i32;
                f.subject_index = ((f.subject_index as i32 + step + len) % len) as usize;
            }
            true
        }
        ItemForm::Profile(f) if f.current_field == ProfileField::PreferredTime => {
            let len = PreferredTime::ALL.len() as i32;
            f.preferred_index = ((f.preferred_index as i32 + step + len) % len) as usize;
            true
        }
        ItemForm::Profile(f) if f.current_field == ProfileField::Notifications => {
            f.notifications = !f.notifications;
            true
        }
        ItemForm::Profile(f) if f.current_field == ProfileField::Sound => {
            f.sound = !f.sound;
            true
        }
        _ => false,
    }
}

fn is_multiline_active(form: &ItemForm) -> bool {
    match form {
        ItemForm::Task(f) => f.current_field == TaskField::Description,
        ItemForm::Note(f) => f.current_field == NoteField::Content,
        _ => false,
    }
}

fn active_editor(form: &mut ItemForm) -> Option<&mut Editor> {
    match form {
        ItemForm::Subject(f) => Some(match f.current_field {
            SubjectField::Name => &mut f.name,
            SubjectField::Description => &mut f.description,
            SubjectField::Color => &mut f.color,
            SubjectField::Goal => &mut f.goal,
        }),
        ItemForm::Task(f) => Some(match f.current_field {
            TaskField::Title => &mut f.title,
            TaskField::Description => &mut f.description,
            TaskField::DueDate => &mut f.due_date,
        }),
        ItemForm::Note(f) => Some(match f.current_field {
            NoteField::Title => &mut f.title,
            NoteField::Content => &mut f.content,
        }),
        ItemForm::Session(f) => match f.current_field {
            SessionField::Minutes => Some(&mut f.minutes),
            SessionField::Subject => None,
        },
        ItemForm::Profile(f) => match f.current_field {
            ProfileField::Name => Some(&mut f.name),
            ProfileField::Email => Some(&mut f.email),
            ProfileField::Bio => Some(&mut f.bio),
            ProfileField::Avatar => Some(&mut f.avatar),
            ProfileField::FocusMinutes => Some(&mut f.focus_minutes),
            ProfileField::BreakMinutes => Some(&mut f.break_minutes),
            ProfileField::DailyGoalHours => Some(&mut f.daily_goal_hours),
            _ => None,
        },
    }
}

fn optional_text(editor: &Editor) -> Option<String> {
    let text = editor.text().trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

/// Validate and persist the active form. Validation failures keep the
/// form open with a status message; nothing reaches the store.
fn submit_form(app: &mut App) {
    let Some(form) = app.form.clone() else {
        return;
    };

    match form {
        ItemForm::Subject(f) => {
            let goal_text = f.goal.text().trim().to_string();
            let goal = if goal_text.is_empty() {
                0.0
            } else {
                match goal_text.parse::<f64>() {
                    Ok(v) => v,
                    Err(_) => {
                        app.set_status_message(format!("Invalid goal hours: '{}'", goal_text));
                        return;
                    }
                }
            };
            let color = f.color.text().trim().to_string();
            let mut subject = match f.editing_id {
                Some(ref id) => match app.subjects.iter().find(|s| s.id == *id) {
                    Some(existing) => existing.clone(),
                    None => Subject::new(String::new()),
                },
                None => Subject::new(String::new()),
            };
            subject.name = f.name.text().trim().to_string();
            subject.description = optional_text(&f.description);
            subject.color = if color.is_empty() { "cyan".to_string() } else { color };
            subject.goal_hours_per_week = goal;

            if let Err(e) = subject.validate() {
                app.set_status_message(format!("{}", e));
                return;
            }

            match f.editing_id {
                Some(ref id) => {
                    if let Some(slot) = app.subjects.iter_mut().find(|s| s.id == *id) {
                        *slot = subject;
                    }
                }
                None => app.subjects.push(subject),
            }
            if app.persist_subjects() {
                app.set_status_message("Subject saved".to_string());
                app.form = None;
                app.ui.mode = Mode::View;
                app.clamp_selection();
            }
        }
        ItemForm::Task(f) => {
            let mut task = match f.editing_id {
                Some(ref id) => match app.tasks.iter().find(|t| t.id == *id) {
                    Some(existing) => existing.clone(),
                    None => Task::new(String::new()),
                },
                None => Task::new(String::new()),
            };
            task.title = f.title.text().trim().to_string();
            task.description = optional_text(&f.description);
            task.due_date = optional_text(&f.due_date);

            if let Err(e) = task.validate() {
                app.set_status_message(format!("{}", e));
                return;
            }

            match f.editing_id {
                Some(ref id) => {
                    if let Some(slot) = app.tasks.iter_mut().find(|t| t.id == *id) {
                        *slot = task;
                    }
                }
                None => app.tasks.push(task),
            }
            if app.persist_tasks() {
                app.set_status_message("Task saved".to_string());
                app.form = None;
                app.ui.mode = Mode::View;
                app.clamp_selection();
            }
        }
        ItemForm::Note(f) => {
            let mut note = match f.editing_id {
                Some(ref id) => match app.notes.iter().find(|n| n.id == *id) {
                    Some(existing) => existing.clone(),
                    None => Note::new(String::new()),
                },
                None => Note::new(String::new()),
            };
            note.title = f.title.text().trim().to_string();
            note.content = optional_text(&f.content);
            note.updated_at = current_timestamp_string();

            if let Err(e) = note.validate() {
                app.set_status_message(format!("{}", e));
                return;
            }

            match f.editing_id {
                Some(ref id) => {
                    if let Some(slot) = app.notes.iter_mut().find(|n| n.id == *id) {
                        *slot = note;
                    }
                }
                None => app.notes.push(note),
            }
            if app.persist_notes() {
                app.set_status_message("Note saved".to_string());
                app.form = None;
                app.ui.mode = Mode::View;
                app.clamp_selection();
            }
        }
        ItemForm::Session(f) => {
            let minutes_text = f.minutes.text().trim().to_string();
            let minutes = match minutes_text.parse::<i64>() {
                Ok(v) => v,
                Err(_) => {
                    app.set_status_message(format!("Invalid minutes: '{}'", minutes_text));
                    return;
                }
            };
            let choices = app.subject_choices();
            let subject = choices
                .get(f.subject_index)
                .cloned()
                .unwrap_or_else(|| "General".to_string());
            if app.record_session(&subject, minutes) {
                app.form = None;
                app.ui.mode = Mode::View;
            }
        }
        ItemForm::Profile(f) => {
            let focus = match f.focus_minutes.text().trim().parse::<u32>() {
                Ok(v) if v > 0 => v,
                _ => {
                    app.set_status_message("Focus minutes must be a positive number".to_string());
                    return;
                }
            };
            let break_minutes = match f.break_minutes.text().trim().parse::<u32>() {
                Ok(v) if v > 0 => v,
                _ => {
                    app.set_status_message("Break minutes must be a positive number".to_string());
                    return;
                }
            };
            let daily_goal = match f.daily_goal_hours.text().trim().parse::<f64>() {
                Ok(v) if v >= 0.0 => v,
                _ => {
                    app.set_status_message("Daily goal must be a non-negative number".to_string());
                    return;
                }
            };

            app.profile.name = f.name.text().trim().to_string();
            app.profile.email = f.email.text().trim().to_string();
            app.profile.bio = f.bio.text().trim().to_string();
            app.profile.avatar = f.avatar.text().trim().to_string();
            app.profile.preferences.preferred_time = PreferredTime::ALL
                .get(f.preferred_index)
                .copied()
                .unwrap_or(PreferredTime::Evening);
            app.profile.preferences.focus_minutes = focus;
            app.profile.preferences.break_minutes = break_minutes;
            app.profile.preferences.daily_goal_hours = daily_goal;
            app.profile.preferences.notifications = f.notifications;
            app.profile.preferences.sound = f.sound;

            if app.persist_profile() {
                app.set_status_message("Profile saved".to_string());
                app.form = None;
                app.ui.mode = Mode::View;
            }
        }
    }
}
