use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratskin::RatSkin;
use termimad::minimad::Text as MinimadText;

use crate::Config;
use crate::models::{Note, Subject, Task};
use crate::tui::widgets::color::parse_color;

/// Markdown summary of a subject with its derived weekly numbers
pub fn subject_markdown(subject: &Subject, hours: f64, percent: f64, trend: i64) -> String {
    let mut content = format!("**Subject:** {}\n", subject.name);
    if let Some(ref description) = subject.description {
        if !description.is_empty() {
            content.push_str(&format!("\n{}\n", description));
        }
    }
    content.push_str(&format!("\n**Color:** {}\n", subject.color));
    content.push_str(&format!(
        "**Weekly goal:** {:.1}h\n",
        subject.goal_hours_per_week
    ));
    content.push_str(&format!(
        "\n**This week:** {:.1}h ({:.0}% of goal)\n",
        hours, percent
    ));
    content.push_str(&format!("**Session trend:** {:+} min\n", trend));
    content
}

pub fn task_markdown(task: &Task) -> String {
    let mut content = format!("**Title:** {}\n", task.title);
    content.push_str(&format!(
        "**Status:** {}\n",
        if task.completed { "done" } else { "open" }
    ));
    if let Some(ref due) = task.due_date {
        if !due.is_empty() {
            content.push_str(&format!("**Due date:** {}\n", due));
        }
    }
    if let Some(ref description) = task.description {
        if !description.is_empty() {
            content.push_str("\n**Description:**\n\n");
            content.push_str(description);
            content.push('\n');
        }
    }
    content
}

pub fn note_markdown(note: &Note) -> String {
    let mut content = format!("**Title:** {}\n", note.title);
    content.push_str(&format!("**Updated:** {}\n", note.updated_at));
    if let Some(ref body) = note.content {
        if !body.is_empty() {
            content.push_str("\n");
            content.push_str(body);
            content.push('\n');
        }
    }
    content
}

/// Render a markdown string into a bordered pane.
/// ratskin handles emphasis/lists; the scroll offset is in lines.
pub fn render_markdown_pane(
    f: &mut Frame,
    area: Rect,
    title: &str,
    markdown: &str,
    config: &Config,
    scroll: u16,
) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    let text_width = area.width.saturating_sub(2);
    let parsed = RatSkin::default().parse(MinimadText::from(markdown), text_width);

    // Convert ratskin lines into ratatui lines, keeping span styling
    let lines: Vec<Line> = parsed
        .into_iter()
        .map(|line| {
            let spans: Vec<Span> = line
                .spans
                .into_iter()
                .map(|span| Span::styled(span.content.to_string(), span.style))
                .collect();
            Line::from(spans)
        })
        .collect();

    let base_style = Style::default().fg(parse_color(&config.get_active_theme().fg));
    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .style(base_style)
        .scroll((scroll, 0))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Placeholder pane for list tabs with nothing selected
pub fn render_empty_detail(f: &mut Frame, area: Rect, hint: &str, config: &Config) {
    let fg_color = parse_color(&config.get_active_theme().fg);
    let paragraph = Paragraph::new(hint.to_string())
        .block(Block::default().borders(Borders::ALL).title("Detail"))
        .style(Style::default().fg(fg_color));
    f.render_widget(paragraph, area);
}
