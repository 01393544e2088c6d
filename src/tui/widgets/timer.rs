use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use std::time::Duration;

use crate::Config;
use crate::tui::app::{TimerPhase, TimerState};
use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display;

pub fn render_timer(
    f: &mut Frame,
    area: Rect,
    timer: &TimerState,
    target_minutes: u32,
    subject: &str,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.highlight_bg);

    let target = Duration::from_secs(target_minutes as u64 * 60);
    let remaining = target.saturating_sub(timer.elapsed());
    let remaining_secs = remaining.as_secs();

    let phase_label = match timer.phase {
        TimerPhase::Focus => "FOCUS",
        TimerPhase::Break => "BREAK",
    };
    let state_label = if timer.is_running() {
        "running"
    } else if timer.elapsed() > Duration::ZERO {
        "paused"
    } else {
        "stopped"
    };

    let kb = &config.key_bindings;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            phase_label,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60),
            Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("({} of {} min, {})", timer.elapsed().as_secs() / 60, target_minutes, state_label),
            Style::default().fg(fg_color),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Subject: ", Style::default().fg(fg_color)),
            Span::styled(
                subject.to_string(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{}: start/pause  {}: log now  {}: reset  {}/{}: subject",
                format_key_binding_for_display(&kb.timer_toggle),
                format_key_binding_for_display(&kb.select),
                format_key_binding_for_display(&kb.timer_reset),
                format_key_binding_for_display(&kb.list_up),
                format_key_binding_for_display(&kb.list_down),
            ),
            Style::default().fg(fg_color),
        )),
        Line::from(Span::styled(
            "Focus and break lengths come from your profile preferences",
            Style::default().fg(fg_color),
        )),
    ];

    if timer.phase == TimerPhase::Break {
        lines.push(Line::from(Span::styled(
            "Breaks are not recorded as study time",
            Style::default().fg(fg_color),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Pomodoro"))
        .style(Style::default().fg(fg_color))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
