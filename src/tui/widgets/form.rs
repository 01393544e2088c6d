use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::models::PreferredTime;
use crate::tui::app::{
    ItemForm, NoteField, NoteForm, ProfileField, ProfileForm, SessionField, SessionForm,
    SubjectField, SubjectForm, TaskField, TaskForm,
};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::editor::Editor;
use crate::utils::format_key_binding_for_display;

/// One line of a form: label plus current value. Text fields place the
/// terminal cursor; choice/toggle fields render as `< value >`.
struct FieldRow<'a> {
    label: &'a str,
    value: String,
    active: bool,
    cursor_col: Option<usize>,
}

impl<'a> FieldRow<'a> {
    fn text(label: &'a str, editor: &Editor, active: bool) -> Self {
        Self {
            label,
            value: editor.text(),
            active,
            cursor_col: if active { Some(editor.cursor_col) } else { None },
        }
    }

    fn choice(label: &'a str, value: String, active: bool) -> Self {
        Self {
            label,
            value: format!("< {} >", value),
            active,
            cursor_col: None,
        }
    }
}

const LABEL_WIDTH: usize = 14;

fn render_form_frame(f: &mut Frame, area: Rect, title: &str, config: &Config) -> Rect {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = block.inner(area);
    f.render_widget(block, area);
    inner
}

fn render_rows(f: &mut Frame, area: Rect, rows: &[FieldRow], config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    for (i, row) in rows.iter().enumerate() {
        if i as u16 >= area.height {
            break;
        }
        let row_area = Rect::new(area.x, area.y + i as u16, area.width, 1);
        let style = if row.active {
            Style::default().fg(highlight_fg).bg(highlight_bg)
        } else {
            Style::default().fg(fg_color)
        };
        let line = Line::from(vec![
            Span::styled(format!("{:<width$}", row.label, width = LABEL_WIDTH), style),
            Span::styled(row.value.clone(), style),
        ]);
        f.render_widget(Paragraph::new(line).style(style), row_area);

        if let Some(cursor_col) = row.cursor_col {
            let x = row_area.x + LABEL_WIDTH as u16 + cursor_col as u16;
            if x < row_area.x + row_area.width {
                f.set_cursor_position((x, row_area.y));
            }
        }
    }
}

/// Multi-line text area with its own border. Scrolls just enough to keep
/// the cursor row visible.
fn render_multiline(
    f: &mut Frame,
    area: Rect,
    title: &str,
    editor: &Editor,
    active: bool,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let border_style = if active {
        Style::default().fg(highlight_bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(fg_color)
    };

    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = editor.cursor_row.saturating_sub(inner_height.saturating_sub(1)) as u16;

    let paragraph = Paragraph::new(editor.text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(border_style),
        )
        .style(Style::default().fg(fg_color))
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);

    if active && area.width > 2 && area.height > 2 {
        let x = area.x + 1 + editor.cursor_col as u16;
        let y = area.y + 1 + (editor.cursor_row as u16).saturating_sub(scroll);
        if x < area.x + area.width - 1 && y < area.y + area.height - 1 {
            f.set_cursor_position((x, y));
        }
    }
}

fn render_hint(f: &mut Frame, area: Rect, config: &Config) {
    let fg_color = parse_color(&config.get_active_theme().fg);
    let hint = format!(
        "Tab: next field  {}: save  Esc: cancel",
        format_key_binding_for_display(&config.key_bindings.save)
    );
    let paragraph = Paragraph::new(hint).style(Style::default().fg(fg_color).add_modifier(Modifier::DIM));
    f.render_widget(paragraph, area);
}

pub fn render_item_form(
    f: &mut Frame,
    area: Rect,
    form: &ItemForm,
    subject_choices: &[String],
    config: &Config,
) {
    match form {
        ItemForm::Subject(form) => render_subject_form(f, area, form, config),
        ItemForm::Task(form) => render_task_form(f, area, form, config),
        ItemForm::Note(form) => render_note_form(f, area, form, config),
        ItemForm::Session(form) => render_session_form(f, area, form, subject_choices, config),
        ItemForm::Profile(form) => render_profile_form(f, area, form, config),
    }
}

fn render_subject_form(f: &mut Frame, area: Rect, form: &SubjectForm, config: &Config) {
    let title = if form.editing_id.is_some() {
        "Edit Subject"
    } else {
        "New Subject"
    };
    let inner = render_form_frame(f, area, title, config);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let rows = [
        FieldRow::text("Name", &form.name, form.current_field == SubjectField::Name),
        FieldRow::text(
            "Description",
            &form.description,
            form.current_field == SubjectField::Description,
        ),
        FieldRow::text("Color", &form.color, form.current_field == SubjectField::Color),
        FieldRow::text(
            "Goal (h/week)",
            &form.goal,
            form.current_field == SubjectField::Goal,
        ),
    ];
    render_rows(f, parts[0], &rows, config);
    render_hint(f, parts[2], config);
}

fn render_task_form(f: &mut Frame, area: Rect, form: &TaskForm, config: &Config) {
    let title = if form.editing_id.is_some() {
        "Edit Task"
    } else {
        "New Task"
    };
    let inner = render_form_frame(f, area, title, config);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);

    let rows = [
        FieldRow::text("Title", &form.title, form.current_field == TaskField::Title),
        FieldRow::text(
            "Due (Y-M-D)",
            &form.due_date,
            form.current_field == TaskField::DueDate,
        ),
    ];
    render_rows(f, parts[0], &rows, config);
    render_multiline(
        f,
        parts[1],
        "Description",
        &form.description,
        form.current_field == TaskField::Description,
        config,
    );
    render_hint(f, parts[2], config);
}

fn render_note_form(f: &mut Frame, area: Rect, form: &NoteForm, config: &Config) {
    let title = if form.editing_id.is_some() {
        "Edit Note"
    } else {
        "New Note"
    };
    let inner = render_form_frame(f, area, title, config);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);

    let rows = [FieldRow::text(
        "Title",
        &form.title,
        form.current_field == NoteField::Title,
    )];
    render_rows(f, parts[0], &rows, config);
    render_multiline(
        f,
        parts[1],
        "Content (markdown)",
        &form.content,
        form.current_field == NoteField::Content,
        config,
    );
    render_hint(f, parts[2], config);
}

fn render_session_form(
    f: &mut Frame,
    area: Rect,
    form: &SessionForm,
    subject_choices: &[String],
    config: &Config,
) {
    let inner = render_form_frame(f, area, "Log Study Session", config);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let subject = subject_choices
        .get(form.subject_index)
        .cloned()
        .unwrap_or_else(|| "General".to_string());
    let rows = [
        FieldRow::choice(
            "Subject",
            subject,
            form.current_field == SessionField::Subject,
        ),
        FieldRow::text(
            "Minutes",
            &form.minutes,
            form.current_field == SessionField::Minutes,
        ),
    ];
    render_rows(f, parts[0], &rows, config);
    render_hint(f, parts[2], config);
}

fn render_profile_form(f: &mut Frame, area: Rect, form: &ProfileForm, config: &Config) {
    let inner = render_form_frame(f, area, "Edit Profile", config);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let preferred = PreferredTime::ALL
        .get(form.preferred_index)
        .copied()
        .unwrap_or(PreferredTime::Evening);
    let on_off = |b: bool| if b { "on" } else { "off" }.to_string();

    let rows = [
        FieldRow::text("Name", &form.name, form.current_field == ProfileField::Name),
        FieldRow::text("Email", &form.email, form.current_field == ProfileField::Email),
        FieldRow::text("Bio", &form.bio, form.current_field == ProfileField::Bio),
        FieldRow::text(
            "Avatar",
            &form.avatar,
            form.current_field == ProfileField::Avatar,
        ),
        FieldRow::choice(
            "Best time",
            preferred.label().to_string(),
            form.current_field == ProfileField::PreferredTime,
        ),
        FieldRow::text(
            "Focus (min)",
            &form.focus_minutes,
            form.current_field == ProfileField::FocusMinutes,
        ),
        FieldRow::text(
            "Break (min)",
            &form.break_minutes,
            form.current_field == ProfileField::BreakMinutes,
        ),
        FieldRow::text(
            "Daily goal (h)",
            &form.daily_goal_hours,
            form.current_field == ProfileField::DailyGoalHours,
        ),
        FieldRow::choice(
            "Notifications",
            on_off(form.notifications),
            form.current_field == ProfileField::Notifications,
        ),
        FieldRow::choice(
            "Sound",
            on_off(form.sound),
            form.current_field == ProfileField::Sound,
        ),
    ];
    render_rows(f, parts[0], &rows, config);
    render_hint(f, parts[2], config);
}
