use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{BarChart, Block, Borders, Paragraph};

use crate::Config;
use crate::metrics;
use crate::models::{StudySession, Subject};
use crate::tui::widgets::color::parse_color;

/// Trailing window shown in the histogram
const HISTOGRAM_DAYS: u64 = 7;

pub fn render_analytics(
    f: &mut Frame,
    area: Rect,
    subjects: &[Subject],
    sessions: &[StudySession],
    today: NaiveDate,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.highlight_bg);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Histogram
            Constraint::Length(4), // Totals
            Constraint::Length((subjects.len() as u16 + 2).max(3)), // Trends
        ])
        .split(area);

    // Last-7-days histogram, oldest on the left
    let buckets = metrics::daily_histogram(sessions, HISTOGRAM_DAYS, today);
    let data: Vec<(&str, u64)> = buckets
        .iter()
        .map(|b| (b.label.as_str(), b.minutes.max(0) as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Minutes per day (last 7 days)"),
        )
        .data(data.as_slice())
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(accent))
        .value_style(Style::default().fg(fg_color).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(fg_color));
    f.render_widget(chart, rows[0]);

    // Totals
    let total = metrics::total_minutes(sessions);
    let average = metrics::daily_average_minutes(sessions);
    let totals = Paragraph::new(vec![
        Line::from(format!(
            "Total recorded: {}h {}m over {} session{}",
            total / 60,
            total % 60,
            sessions.len(),
            if sessions.len() == 1 { "" } else { "s" },
        )),
        Line::from(format!("Daily average: {:.0} min", average)),
    ])
    .block(Block::default().borders(Borders::ALL).title("Totals"))
    .style(Style::default().fg(fg_color));
    f.render_widget(totals, rows[1]);

    // Per-subject trend: change between the two most recent sessions
    let trend_lines: Vec<Line> = if subjects.is_empty() {
        vec![Line::from("No subjects yet")]
    } else {
        subjects
            .iter()
            .map(|subject| {
                let trend = metrics::trend_minutes(sessions, &subject.name);
                let marker = match trend.cmp(&0) {
                    std::cmp::Ordering::Greater => "▲",
                    std::cmp::Ordering::Less => "▼",
                    std::cmp::Ordering::Equal => "=",
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:<20}", subject.name),
                        Style::default().fg(parse_color(&subject.color)),
                    ),
                    Span::styled(
                        format!("{} {:+} min", marker, trend),
                        Style::default().fg(fg_color),
                    ),
                ])
            })
            .collect()
    };
    let trends = Paragraph::new(trend_lines)
        .block(Block::default().borders(Borders::ALL).title("Session Trend"))
        .style(Style::default().fg(fg_color));
    f.render_widget(trends, rows[2]);
}
