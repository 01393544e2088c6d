use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::models::StudentProfile;
use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display;

pub fn render_profile(f: &mut Frame, area: Rect, profile: &StudentProfile, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.highlight_bg);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Identity
            Constraint::Length(9), // Preferences
            Constraint::Min(3),    // Achievements
        ])
        .split(area);

    let field = |label: &str, value: &str| -> Line {
        Line::from(vec![
            Span::styled(format!("{:<12}", label), Style::default().fg(fg_color)),
            Span::styled(value.to_string(), Style::default().fg(accent)),
        ])
    };

    let or_dash = |s: &str| -> String {
        if s.is_empty() { "-".to_string() } else { s.to_string() }
    };

    let identity = Paragraph::new(vec![
        field("Name", &or_dash(&profile.name)),
        field("Email", &or_dash(&profile.email)),
        field("Bio", &or_dash(&profile.bio)),
        field("Avatar", &or_dash(&profile.avatar)),
        Line::from(Span::styled(
            format!(
                "{}: edit",
                format_key_binding_for_display(&config.key_bindings.edit)
            ),
            Style::default().fg(fg_color).add_modifier(Modifier::DIM),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("Profile"))
    .style(Style::default().fg(fg_color));
    f.render_widget(identity, rows[0]);

    let prefs = &profile.preferences;
    let preferences = Paragraph::new(vec![
        field("Best time", prefs.preferred_time.label()),
        field("Focus", &format!("{} min", prefs.focus_minutes)),
        field("Break", &format!("{} min", prefs.break_minutes)),
        field("Daily goal", &format!("{:.1} h", prefs.daily_goal_hours)),
        field("Notify", if prefs.notifications { "on" } else { "off" }),
        field("Sound", if prefs.sound { "on" } else { "off" }),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Study Preferences"),
    )
    .style(Style::default().fg(fg_color));
    f.render_widget(preferences, rows[1]);

    let achievement_lines: Vec<Line> = if profile.achievements.is_empty() {
        vec![Line::from("Nothing earned yet - keep studying")]
    } else {
        profile
            .achievements
            .iter()
            .map(|a| {
                Line::from(vec![
                    Span::styled(
                        format!("★ {}", a.title),
                        Style::default().fg(accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {}", a.description), Style::default().fg(fg_color)),
                ])
            })
            .collect()
    };
    let achievements = Paragraph::new(achievement_lines)
        .block(Block::default().borders(Borders::ALL).title("Achievements"))
        .style(Style::default().fg(fg_color))
        .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(achievements, rows[2]);
}
