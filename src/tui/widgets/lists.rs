use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Scrollbar, ScrollbarOrientation, ScrollbarState,
    StatefulWidget,
};

use crate::Config;
use crate::models::{Note, Subject, Task};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

/// Shared list rendering: bordered list with highlight and a scrollbar
/// when the items overflow the viewport.
fn render_list(
    f: &mut Frame,
    area: Rect,
    title: String,
    items: Vec<ListItem>,
    list_state: &mut ListState,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let list_area = areas[0];
    let scrollbar_area = areas[1];

    let total_items = items.len();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(parse_color(&active_theme.fg)))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    let visible_items = list_area.height.saturating_sub(2) as usize;
    if total_items > visible_items && scrollbar_area.width > 0 && list_area.height > 2 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1,
            scrollbar_area.width,
            list_area.height.saturating_sub(2),
        );

        let selected_index = list_state.selected().unwrap_or(0);
        let scroll_position = if selected_index < visible_items {
            0
        } else {
            selected_index.saturating_sub(visible_items - 1)
        };

        let mut scrollbar_state = ScrollbarState::new(total_items)
            .viewport_content_length(visible_items)
            .position(scroll_position);

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
    }
}

fn truncated(text: String, max_width: usize) -> String {
    if text.chars().count() > max_width {
        text.chars().take(max_width.saturating_sub(1)).collect::<String>() + "…"
    } else {
        text
    }
}

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
    list_state: &mut ListState,
    config: &Config,
) {
    let max_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let status_indicator = if task.completed { "✓" } else { "○" };
            let due_str = task
                .due_date
                .as_ref()
                .filter(|d| !d.is_empty())
                .map(|d| format!(" [{}]", d))
                .unwrap_or_default();
            ListItem::new(truncated(
                format!("{} {}{}", status_indicator, task.title, due_str),
                max_width,
            ))
        })
        .collect();

    let done = tasks.iter().filter(|t| t.completed).count();
    let title = format!("Tasks ({} of {} done)", done, tasks.len());
    render_list(f, area, title, items, list_state, config);
}

pub fn render_subject_list(
    f: &mut Frame,
    area: Rect,
    subjects: &[Subject],
    weekly_hours: &[f64],
    list_state: &mut ListState,
    config: &Config,
) {
    let max_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = subjects
        .iter()
        .enumerate()
        .map(|(i, subject)| {
            let hours = weekly_hours.get(i).copied().unwrap_or(0.0);
            let line = format!(
                "{} ({:.1}h/{:.1}h)",
                subject.name, hours, subject.goal_hours_per_week
            );
            ListItem::new(truncated(line, max_width))
                .style(Style::default().fg(parse_color(&subject.color)))
        })
        .collect();

    let title = format!("Subjects ({})", subjects.len());
    render_list(f, area, title, items, list_state, config);
}

pub fn render_note_list(
    f: &mut Frame,
    area: Rect,
    notes: &[Note],
    list_state: &mut ListState,
    config: &Config,
) {
    let max_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| ListItem::new(truncated(note.title.clone(), max_width)))
        .collect();

    let title = format!("Notes ({})", notes.len());
    render_list(f, area, title, items, list_state, config);
}
