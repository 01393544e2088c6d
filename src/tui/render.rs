use ratatui::Frame;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::metrics;
use crate::tui::app::{App, Mode, Tab};
use crate::tui::Layout;
use crate::tui::widgets::{
    analytics::render_analytics,
    color::parse_color,
    confirm_delete::render_confirm_delete,
    dashboard::render_dashboard,
    detail::{
        note_markdown, render_empty_detail, render_markdown_pane, subject_markdown, task_markdown,
    },
    form::render_item_form,
    help::render_help,
    lists::{render_note_list, render_subject_list, render_task_list},
    profile_view::render_profile,
    status_bar::render_status_bar,
    tabs::render_tabs,
    timer::render_timer,
};
use crate::utils::{format_key_binding_for_display, today};

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    // Outer border with the app title centered in the top edge
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("STUDYTRACK")
        .title_alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.ui.current_tab, &app.config);

    // Sidebar list on list tabs
    if app.ui.current_tab.has_sidebar() && layout.sidebar_area.width > 0 {
        match app.ui.current_tab {
            Tab::Tasks => {
                render_task_list(
                    f,
                    layout.sidebar_area,
                    &app.tasks,
                    &mut app.ui.list_state,
                    &app.config,
                );
            }
            Tab::Subjects => {
                let now = today();
                let weekly_hours: Vec<f64> = app
                    .subjects
                    .iter()
                    .map(|s| metrics::weekly_progress_hours(&app.sessions, &s.name, now))
                    .collect();
                render_subject_list(
                    f,
                    layout.sidebar_area,
                    &app.subjects,
                    &weekly_hours,
                    &mut app.ui.list_state,
                    &app.config,
                );
            }
            Tab::Notes => {
                render_note_list(
                    f,
                    layout.sidebar_area,
                    &app.notes,
                    &mut app.ui.list_state,
                    &app.config,
                );
            }
            _ => {}
        }
    }

    // Main pane: active form wins, otherwise the tab's own content
    if app.ui.mode == Mode::Form {
        if let Some(ref form) = app.form {
            let choices = app.subject_choices();
            render_item_form(f, layout.main_area, form, &choices, &app.config);
        }
    } else {
        render_main_content(f, app, layout);
    }

    // Overlays
    if app.ui.mode == Mode::Help {
        render_help(f, f.area(), &app.config);
    }
    if let Some(ref target) = app.delete_confirmation {
        render_confirm_delete(
            f,
            f.area(),
            target,
            app.delete_modal_selection,
            &app.config,
        );
    }

    let key_hints = get_key_hints(app);
    render_status_bar(
        f,
        layout.status_area,
        app.status.message.as_ref(),
        &key_hints,
        &app.config,
    );
}

fn render_main_content(f: &mut Frame, app: &mut App, layout: &Layout) {
    let now = today();
    match app.ui.current_tab {
        Tab::Dashboard => {
            render_dashboard(
                f,
                layout.main_area,
                &app.subjects,
                &app.sessions,
                &app.streak,
                &app.profile,
                now,
                &app.config,
            );
        }
        Tab::Timer => {
            let subject = app.timer_subject();
            let target = app.timer_target_minutes();
            render_timer(f, layout.main_area, &app.timer, target, &subject, &app.config);
        }
        Tab::Analytics => {
            render_analytics(
                f,
                layout.main_area,
                &app.subjects,
                &app.sessions,
                now,
                &app.config,
            );
        }
        Tab::Profile => {
            render_profile(f, layout.main_area, &app.profile, &app.config);
        }
        Tab::Subjects => {
            if let Some(subject) = app.selected_subject() {
                let hours = metrics::weekly_progress_hours(&app.sessions, &subject.name, now);
                let percent = metrics::goal_progress_percent(hours, subject.goal_hours_per_week);
                let trend = metrics::trend_minutes(&app.sessions, &subject.name);
                let markdown = subject_markdown(subject, hours, percent, trend);
                render_markdown_pane(
                    f,
                    layout.main_area,
                    "Subject",
                    &markdown,
                    &app.config,
                    app.ui.detail_scroll,
                );
            } else {
                render_empty_detail(
                    f,
                    layout.main_area,
                    "No subject selected - press n to add one",
                    &app.config,
                );
            }
        }
        Tab::Tasks => {
            if let Some(task) = app.selected_task() {
                let markdown = task_markdown(task);
                render_markdown_pane(
                    f,
                    layout.main_area,
                    "Task",
                    &markdown,
                    &app.config,
                    app.ui.detail_scroll,
                );
            } else {
                render_empty_detail(
                    f,
                    layout.main_area,
                    "No task selected - press n to add one",
                    &app.config,
                );
            }
        }
        Tab::Notes => {
            if let Some(note) = app.selected_note() {
                let markdown = note_markdown(note);
                render_markdown_pane(
                    f,
                    layout.main_area,
                    "Note",
                    &markdown,
                    &app.config,
                    app.ui.detail_scroll,
                );
            } else {
                render_empty_detail(
                    f,
                    layout.main_area,
                    "No note selected - press n to add one",
                    &app.config,
                );
            }
        }
    }
}

fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    match app.ui.mode {
        Mode::Help => {
            vec![format!(
                "Esc or {}: Exit help",
                format_key_binding_for_display(&kb.help)
            )]
        }
        Mode::Form => {
            vec![
                "Tab/Shift+Tab: Fields".to_string(),
                format!("{}: Save", format_key_binding_for_display(&kb.save)),
                "Esc: Cancel".to_string(),
            ]
        }
        Mode::View => {
            let mut hints = vec![
                format!("{}: Quit", format_key_binding_for_display(&kb.quit)),
                format!(
                    "{}/{}: Tabs",
                    format_key_binding_for_display(&kb.tab_left),
                    format_key_binding_for_display(&kb.tab_right)
                ),
            ];
            match app.ui.current_tab {
                Tab::Dashboard | Tab::Analytics => {
                    hints.push(format!(
                        "{}: Log session",
                        format_key_binding_for_display(&kb.new)
                    ));
                }
                Tab::Timer => {
                    hints.push(format!(
                        "{}: Start/pause",
                        format_key_binding_for_display(&kb.timer_toggle)
                    ));
                    hints.push(format!(
                        "{}: Log now",
                        format_key_binding_for_display(&kb.select)
                    ));
                    hints.push(format!(
                        "{}: Reset",
                        format_key_binding_for_display(&kb.timer_reset)
                    ));
                }
                Tab::Profile => {
                    hints.push(format!(
                        "{}: Edit profile",
                        format_key_binding_for_display(&kb.edit)
                    ));
                }
                Tab::Tasks => {
                    hints.push(format!("{}: New", format_key_binding_for_display(&kb.new)));
                    hints.push(format!("{}: Edit", format_key_binding_for_display(&kb.edit)));
                    hints.push(format!(
                        "{}: Delete",
                        format_key_binding_for_display(&kb.delete)
                    ));
                    hints.push(format!(
                        "{}: Toggle done",
                        format_key_binding_for_display(&kb.toggle_task_status)
                    ));
                }
                Tab::Subjects | Tab::Notes => {
                    hints.push(format!("{}: New", format_key_binding_for_display(&kb.new)));
                    hints.push(format!("{}: Edit", format_key_binding_for_display(&kb.edit)));
                    hints.push(format!(
                        "{}: Delete",
                        format_key_binding_for_display(&kb.delete)
                    ));
                }
            }
            hints.push(format!("{}: Help", format_key_binding_for_display(&kb.help)));
            hints
        }
    }
}
