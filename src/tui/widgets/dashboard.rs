use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::Config;
use crate::metrics;
use crate::models::{StudentProfile, StudySession, StudyStreak, Subject};
use crate::tui::widgets::color::parse_color;

const DAY_LABELS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

pub fn render_dashboard(
    f: &mut Frame,
    area: Rect,
    subjects: &[Subject],
    sessions: &[StudySession],
    streak: &StudyStreak,
    profile: &StudentProfile,
    today: NaiveDate,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.highlight_bg);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Today / streak summary
            Constraint::Length(4), // Week calendar
            Constraint::Min(3),    // Weekly goals
        ])
        .split(area);

    // Summary block
    let today_minutes = metrics::minutes_on(sessions, today);
    let daily_goal_minutes = (profile.preferences.daily_goal_hours * 60.0) as i64;
    let summary_lines = vec![
        Line::from(vec![
            Span::styled("Today: ", Style::default().fg(fg_color)),
            Span::styled(
                format!("{}h {}m", today_minutes / 60, today_minutes % 60),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" of {}h {}m daily goal", daily_goal_minutes / 60, daily_goal_minutes % 60),
                Style::default().fg(fg_color),
            ),
        ]),
        Line::from(vec![
            Span::styled("Streak: ", Style::default().fg(fg_color)),
            Span::styled(
                format!("{} day{}", streak.current_streak, plural(streak.current_streak)),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" (best {})", streak.best_streak),
                Style::default().fg(fg_color),
            ),
        ]),
    ];
    let summary = Paragraph::new(summary_lines)
        .block(Block::default().borders(Borders::ALL).title("Overview"))
        .style(Style::default().fg(fg_color));
    f.render_widget(summary, rows[0]);

    // This week's study calendar, Sunday first
    let calendar = metrics::week_study_calendar(sessions, today);
    let header: Vec<Span> = DAY_LABELS
        .iter()
        .map(|d| Span::styled(format!("{:>3}", d), Style::default().fg(fg_color)))
        .collect();
    let marks: Vec<Span> = calendar
        .iter()
        .map(|studied| {
            if *studied {
                Span::styled("  ✓", Style::default().fg(accent).add_modifier(Modifier::BOLD))
            } else {
                Span::styled("  ·", Style::default().fg(fg_color))
            }
        })
        .collect();
    let calendar_widget = Paragraph::new(vec![Line::from(header), Line::from(marks)])
        .block(Block::default().borders(Borders::ALL).title("This Week"))
        .style(Style::default().fg(fg_color));
    f.render_widget(calendar_widget, rows[1]);

    // Per-subject weekly goal progress
    let goals_block = Block::default().borders(Borders::ALL).title("Weekly Goals");
    let goals_inner = goals_block.inner(rows[2]);
    f.render_widget(goals_block, rows[2]);

    if subjects.is_empty() {
        let hint = Paragraph::new("No subjects yet - press n on the Subjects tab")
            .style(Style::default().fg(fg_color));
        f.render_widget(hint, goals_inner);
        return;
    }

    let constraints: Vec<Constraint> = subjects.iter().map(|_| Constraint::Length(1)).collect();
    let gauge_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(goals_inner);

    for (subject, row) in subjects.iter().zip(gauge_rows.iter()) {
        let hours = metrics::weekly_progress_hours(sessions, &subject.name, today);
        let percent = metrics::goal_progress_percent(hours, subject.goal_hours_per_week);
        // The gauge itself tops out at 100%; the label keeps the raw value
        let ratio = (percent / 100.0).clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(parse_color(&subject.color)))
            .ratio(ratio)
            .label(format!(
                "{} {:.1}h/{:.1}h ({:.0}%)",
                subject.name, hours, subject.goal_hours_per_week, percent
            ));
        f.render_widget(gauge, *row);
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}
