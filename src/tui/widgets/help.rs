use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);

    // Clear the background first so content does not show through
    f.render_widget(Clear, popup_area);

    let help_text = build_help_text(config);

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

/// Centered rect taking a percentage of the available area.
/// Based on the ratatui popup example: https://ratatui.rs/examples/apps/popup/
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!(
        "  {} / {}: Switch tabs\n",
        format_key_binding_for_display(&kb.tab_left),
        format_key_binding_for_display(&kb.tab_right)
    ));
    text.push_str("  1-7: Jump to tab\n");
    text.push_str(&format!(
        "  {} / {}: Navigate list up/down\n",
        format_key_binding_for_display(&kb.list_up),
        format_key_binding_for_display(&kb.list_down)
    ));
    text.push('\n');

    text.push_str("Actions:\n");
    text.push_str(&format!(
        "  {}: New item (session on Dashboard/Analytics)\n",
        format_key_binding_for_display(&kb.new)
    ));
    text.push_str(&format!(
        "  {}: Edit selected item (profile on Profile tab)\n",
        format_key_binding_for_display(&kb.edit)
    ));
    text.push_str(&format!(
        "  {}: Delete selected item\n",
        format_key_binding_for_display(&kb.delete)
    ));
    text.push_str(&format!(
        "  {}: Toggle task done (Tasks tab)\n",
        format_key_binding_for_display(&kb.toggle_task_status)
    ));
    text.push_str("  Ctrl+C: Copy note content (Notes tab)\n");
    text.push('\n');

    text.push_str("Timer tab:\n");
    text.push_str(&format!(
        "  {}: Start/pause\n",
        format_key_binding_for_display(&kb.timer_toggle)
    ));
    text.push_str(&format!(
        "  {}: Stop and log elapsed minutes\n",
        format_key_binding_for_display(&kb.select)
    ));
    text.push_str(&format!(
        "  {}: Reset without logging\n",
        format_key_binding_for_display(&kb.timer_reset)
    ));
    text.push_str(&format!(
        "  {} / {}: Change subject\n",
        format_key_binding_for_display(&kb.list_up),
        format_key_binding_for_display(&kb.list_down)
    ));
    text.push('\n');

    text.push_str("Forms:\n");
    text.push_str("  Tab / Shift+Tab: Next/previous field\n");
    text.push_str("  Left/Right: Cycle choice fields\n");
    text.push_str(&format!(
        "  {}: Save\n",
        format_key_binding_for_display(&kb.save)
    ));
    text.push_str("  Esc: Cancel\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!(
        "  {}: Quit\n",
        format_key_binding_for_display(&kb.quit)
    ));
    text.push_str(&format!(
        "  {}: Show/hide help\n",
        format_key_binding_for_display(&kb.help)
    ));

    text
}
