use std::time::Instant;

use tuirealm::ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Paragraph, Scrollbar, ScrollbarOrientation,
    },
};

use crate::app::{App, Message};
use crate::theme::Theme;

const WELCOME_BANNER: &str = "Welcome to Task Track!";
const TITLE: &str = "To-Do List";
const INPUT_PLACEHOLDER: &str = "Add a new task";
const SUBMIT_LABEL: &str = "Add Task";
const COMPLETE_LABEL: &str = "Complete";
const EMPTY_HINT: &str = "No tasks yet. Type above and press Enter.";
const KEY_HINTS: &str = "Enter: add  ↑/↓: select  Ctrl+D: complete  Ctrl+T: theme  Esc: quit";

/// Pure function of current state: repaints the whole screen and rebuilds
/// the mouse hit-test map on every frame.
pub fn render(frame: &mut Frame<'_>, app: &mut App) {
    app.hit_test_map.clear();

    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.base.canvas)),
        area,
    );

    if area.width < 24 || area.height < 12 {
        frame.render_widget(
            Paragraph::new("Terminal too small. Enlarge to at least 24x12.")
                .style(Style::default().fg(app.theme.base.text))
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1), // welcome banner
            Constraint::Length(1), // theme toggle
            Constraint::Length(1), // title
            Constraint::Length(3), // input field
            Constraint::Length(1), // submit button
            Constraint::Min(1),    // task list
            Constraint::Length(1), // key hints
        ])
        .split(area);

    render_welcome(frame, chunks[0], app);
    render_theme_toggle(frame, chunks[1], app);
    render_title(frame, chunks[2], app);
    render_input(frame, chunks[3], app);
    render_submit(frame, chunks[4], app);
    render_task_list(frame, chunks[5], app);
    render_hints(frame, chunks[6], app);
}

fn render_welcome(frame: &mut Frame<'_>, area: Rect, app: &App) {
    frame.render_widget(
        Paragraph::new(WELCOME_BANNER)
            .style(
                Style::default()
                    .fg(app.theme.base.text)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        area,
    );
}

fn render_theme_toggle(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let label = format!("  {}  ", app.preset.toggle_label());
    let width = (label.chars().count() as u16).min(area.width);
    let button = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y,
        width,
        height: 1,
    };

    frame.render_widget(
        Paragraph::new(label)
            .style(
                Style::default()
                    .fg(app.theme.control.toggle_fg)
                    .bg(app.theme.control.toggle_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        button,
    );
    app.hit_test_map.push((button, Message::ToggleTheme));
}

fn render_title(frame: &mut Frame<'_>, area: Rect, app: &App) {
    frame.render_widget(
        Paragraph::new(TITLE).style(
            Style::default()
                .fg(app.theme.base.text)
                .add_modifier(Modifier::BOLD),
        ),
        area,
    );
}

fn render_input(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.input.border))
        .style(Style::default().bg(app.theme.input.bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.pending_input.is_empty() {
        frame.render_widget(
            Paragraph::new(INPUT_PLACEHOLDER)
                .style(Style::default().fg(app.theme.input.placeholder)),
            inner,
        );
    } else {
        frame.render_widget(
            Paragraph::new(app.pending_input.as_str())
                .style(Style::default().fg(app.theme.input.fg)),
            inner,
        );
    }

    let cursor_x = inner.x + (app.cursor as u16).min(inner.width.saturating_sub(1));
    frame.set_cursor_position(Position::new(cursor_x, inner.y));
}

fn render_submit(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let label = format!("  {SUBMIT_LABEL}  ");
    let width = (label.chars().count() as u16).min(area.width);
    let button = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y,
        width,
        height: 1,
    };

    frame.render_widget(
        Paragraph::new(label)
            .style(
                Style::default()
                    .fg(app.theme.control.submit_fg)
                    .bg(app.theme.control.submit_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        button,
    );
    app.hit_test_map.push((button, Message::SubmitTask));
}

fn render_task_list(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    if app.tasks.is_empty() {
        frame.render_widget(
            Paragraph::new(EMPTY_HINT)
                .style(Style::default().fg(app.theme.base.text_muted))
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let now = Instant::now();
    // One-line rows with a blank spacer between them.
    let row_step = 2u16;
    let visible_rows = ((area.height + 1) / row_step) as usize;
    let scroll_offset = app.clamped_scroll_offset(visible_rows);

    for (index, task) in app.tasks.iter().enumerate().skip(scroll_offset) {
        let y = area.y + ((index - scroll_offset) as u16) * row_step;
        if y >= area.y + area.height {
            break;
        }

        let selected = index == app.selected;
        let row_bg = if selected {
            app.theme.interactive.selected_bg
        } else {
            app.theme.base.surface
        };

        let alpha = task.fade_alpha(now);
        let text_fg = Theme::fade(app.theme.base.text, row_bg, alpha);
        let complete_fg = Theme::fade(app.theme.control.complete, row_bg, alpha);

        let row_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height: 1,
        };

        let marker = if selected { "▸ " } else { "  " };
        let row = Line::from(vec![
            Span::styled(
                marker,
                Style::default().fg(app.theme.interactive.selected_marker),
            ),
            Span::styled(task.text.as_str(), Style::default().fg(text_fg)),
        ]);
        frame.render_widget(
            Paragraph::new(row).style(Style::default().bg(row_bg)),
            row_area,
        );

        let complete_width = (COMPLETE_LABEL.len() as u16).min(row_area.width);
        let complete_area = Rect {
            x: row_area.x + row_area.width - complete_width,
            y,
            width: complete_width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(COMPLETE_LABEL).style(
                Style::default()
                    .fg(complete_fg)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            complete_area,
        );

        // Row selection first, then the control on top of it.
        app.hit_test_map.push((row_area, Message::SelectRow(index)));
        app.hit_test_map
            .push((complete_area, Message::CompleteTask(task.id)));
    }

    if app.tasks.len() > visible_rows {
        app.list_scroll_state = app
            .list_scroll_state
            .content_length(app.tasks.len().saturating_sub(visible_rows))
            .position(scroll_offset);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .style(Style::default().fg(app.theme.base.border))
            .track_symbol(Some("│"))
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        frame.render_stateful_widget(scrollbar, area, &mut app.list_scroll_state);
    }
}

fn render_hints(frame: &mut Frame<'_>, area: Rect, app: &App) {
    frame.render_widget(
        Paragraph::new(KEY_HINTS)
            .style(Style::default().fg(app.theme.base.text_muted))
            .alignment(Alignment::Center),
        area,
    );
}
