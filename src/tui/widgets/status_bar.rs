use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let max_width = area.width as usize;

    let (mut content, style) = if let Some(msg) = message {
        // Status messages get a highlighted background for visibility
        let msg_fg = get_contrast_text_color(highlight_bg);
        (
            msg.clone(),
            Style::default()
                .fg(msg_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        // Key hints with bullet separators, fitting as many as the width
        // allows
        let separator = " • ";
        let mut hints_text = String::new();
        for (i, hint) in key_hints.iter().enumerate() {
            let would_be = hints_text.chars().count()
                + if i == 0 { 0 } else { separator.chars().count() }
                + hint.chars().count();
            if would_be > max_width {
                if !hints_text.is_empty() {
                    hints_text.push('…');
                }
                break;
            }
            if i > 0 {
                hints_text.push_str(separator);
            }
            hints_text.push_str(hint);
        }
        (hints_text, Style::default().fg(fg_color).bg(bg_color))
    };

    if content.chars().count() > max_width {
        content = content
            .chars()
            .take(max_width.saturating_sub(1))
            .collect::<String>()
            + "…";
    }

    let paragraph = Paragraph::new(content).style(style);
    f.render_widget(paragraph, area);
}
