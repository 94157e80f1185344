use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::debug;
use tuirealm::ratatui::layout::Rect;
use tuirealm::ratatui::widgets::ScrollbarState;
use uuid::Uuid;

use crate::settings::Settings;
use crate::theme::{Theme, ThemeMode, ThemePreset};
use crate::types::Task;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
    SubmitTask,
    CompleteTask(Uuid),
    SelectRow(usize),
    ToggleTheme,
    Quit,
}

/// The whole screen state. Tasks live here and nowhere else; nothing is
/// persisted or shared outside the screen's lifetime.
pub struct App {
    pub should_quit: bool,
    pub preset: ThemePreset,
    pub theme: Theme,
    pub tasks: Vec<Task>,
    pub pending_input: String,
    pub cursor: usize,
    pub selected: usize,
    pub scroll_offset: usize,
    pub viewport: (u16, u16),
    pub hit_test_map: Vec<(Rect, Message)>,
    pub list_scroll_state: ScrollbarState,
}

impl App {
    /// Builds the screen with the startup theme resolved from, in order:
    /// the CLI override, the settings file, the OS color scheme.
    pub fn new(mode_override: Option<ThemeMode>) -> Self {
        let settings = Settings::load();
        let mode = mode_override.unwrap_or_else(|| settings.theme_mode());
        let preset = mode.resolve();
        debug!(mode = mode.as_str(), preset = preset.as_str(), "startup theme resolved");
        Self::with_preset(preset)
    }

    pub fn with_preset(preset: ThemePreset) -> Self {
        Self {
            should_quit: false,
            preset,
            theme: Theme::from_preset(preset),
            tasks: Vec::new(),
            pending_input: String::new(),
            cursor: 0,
            selected: 0,
            scroll_offset: 0,
            viewport: (0, 0),
            hit_test_map: Vec::new(),
            list_scroll_state: ScrollbarState::default(),
        }
    }

    pub fn update(&mut self, message: Message) -> Result<()> {
        match message {
            Message::Key(key) => self.handle_key(key),
            Message::Mouse(mouse) => {
                if let Some(follow_up) = self.handle_mouse(mouse) {
                    self.update(follow_up)?;
                }
            }
            Message::Resize(width, height) => self.viewport = (width, height),
            Message::Tick => {}
            Message::SubmitTask => self.submit_task(),
            Message::CompleteTask(id) => self.complete_task(id),
            Message::SelectRow(index) => self.select_row(index),
            Message::ToggleTheme => self.toggle_theme(),
            Message::Quit => self.should_quit = true,
        }
        Ok(())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('t') => self.toggle_theme(),
                KeyCode::Char('d') => self.complete_selected(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.submit_task(),
            KeyCode::Backspace => self.delete_char_back(),
            KeyCode::Delete => self.delete_char_forward(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_count(),
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::Char(ch) => self.insert_char(ch),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<Message> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.hit_message(mouse.column, mouse.row),
            MouseEventKind::ScrollUp => {
                self.select_previous();
                None
            }
            MouseEventKind::ScrollDown => {
                self.select_next();
                None
            }
            _ => None,
        }
    }

    /// Most recently pushed hit wins, so controls drawn on top of a row
    /// shadow the row itself.
    fn hit_message(&self, x: u16, y: u16) -> Option<Message> {
        self.hit_test_map
            .iter()
            .rev()
            .find(|(rect, _)| {
                x >= rect.x
                    && x < rect.x.saturating_add(rect.width)
                    && y >= rect.y
                    && y < rect.y.saturating_add(rect.height)
            })
            .map(|(_, message)| message.clone())
    }

    // --- pending input -----------------------------------------------------

    pub fn insert_char(&mut self, ch: char) {
        let byte = self.byte_offset(self.cursor);
        self.pending_input.insert(byte, ch);
        self.cursor += 1;
    }

    pub fn delete_char_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte = self.byte_offset(self.cursor);
        self.pending_input.remove(byte);
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_count() {
            let byte = self.byte_offset(self.cursor);
            self.pending_input.remove(byte);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn char_count(&self) -> usize {
        self.pending_input.chars().count()
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.pending_input
            .char_indices()
            .nth(char_pos)
            .map(|(index, _)| index)
            .unwrap_or(self.pending_input.len())
    }

    // --- task operations ---------------------------------------------------

    /// Appends the pending text as a new task. Blank or whitespace-only
    /// input is silently ignored and the pending text is left untouched.
    pub fn submit_task(&mut self) {
        let trimmed = self.pending_input.trim();
        if trimmed.is_empty() {
            return;
        }

        let task = Task::new(trimmed);
        debug!(task_id = %task.id, "task added");
        self.tasks.push(task);
        self.pending_input.clear();
        self.cursor = 0;
        self.selected = self.tasks.len() - 1;
    }

    /// Removes the task with the given id. An absent id is a no-op, not an
    /// error; completing a row twice from a queued mouse click must not
    /// disturb the rest of the list.
    pub fn complete_task(&mut self, id: Uuid) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            return;
        }
        debug!(task_id = %id, "task completed");
        self.clamp_selection();
    }

    pub fn complete_selected(&mut self) {
        if let Some(task) = self.tasks.get(self.selected) {
            let id = task.id;
            self.complete_task(id);
        }
    }

    pub fn toggle_theme(&mut self) {
        self.preset = self.preset.toggled();
        self.theme = Theme::from_preset(self.preset);
        debug!(preset = self.preset.as_str(), "theme toggled");
    }

    // --- selection & scrolling ---------------------------------------------

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tasks.len() {
            self.selected += 1;
        }
    }

    pub fn select_row(&mut self, index: usize) {
        if index < self.tasks.len() {
            self.selected = index;
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.tasks.len() {
            self.selected = self.tasks.len().saturating_sub(1);
        }
    }

    /// Scroll offset that keeps the selected row inside a window of
    /// `visible_rows`, clamped to the list length.
    pub fn clamped_scroll_offset(&mut self, visible_rows: usize) -> usize {
        if visible_rows == 0 || self.tasks.is_empty() {
            self.scroll_offset = 0;
            return 0;
        }

        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_rows {
            self.scroll_offset = self.selected + 1 - visible_rows;
        }

        let max_offset = self.tasks.len().saturating_sub(visible_rows);
        self.scroll_offset = self.scroll_offset.min(max_offset);
        self.scroll_offset
    }

    /// True while any row is still ramping in; drives tick redraws.
    pub fn has_active_fade(&self, now: Instant) -> bool {
        self.tasks.iter().any(|task| task.is_fading(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::with_preset(ThemePreset::Light)
    }

    fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn ctrl(ch: char) -> Message {
        Message::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.update(key(KeyCode::Char(ch))).expect("key update failed");
        }
    }

    #[test]
    fn test_blank_submit_is_a_no_op() {
        let mut app = app();
        app.submit_task();
        assert!(app.tasks.is_empty());

        type_text(&mut app, "   ");
        app.update(key(KeyCode::Enter)).expect("update failed");
        assert!(app.tasks.is_empty());
        // Rejected submits do not reset the pending text.
        assert_eq!(app.pending_input, "   ");
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn test_submit_appends_trimmed_task_and_clears_input() {
        let mut app = app();
        type_text(&mut app, "  Buy milk  ");
        app.update(key(KeyCode::Enter)).expect("update failed");

        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].text, "Buy milk");
        assert_eq!(app.pending_input, "");
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_sequential_submits_preserve_order_with_distinct_ids() {
        let mut app = app();
        type_text(&mut app, "A");
        app.submit_task();
        type_text(&mut app, "B");
        app.submit_task();

        let texts: Vec<&str> = app.tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["A", "B"]);
        assert_ne!(app.tasks[0].id, app.tasks[1].id);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_complete_removes_exactly_one_task() {
        let mut app = app();
        for text in ["first", "second", "third"] {
            type_text(&mut app, text);
            app.submit_task();
        }
        let middle = app.tasks[1].id;

        app.update(Message::CompleteTask(middle))
            .expect("update failed");

        let texts: Vec<&str> = app.tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["first", "third"]);
    }

    #[test]
    fn test_complete_absent_id_is_a_no_op() {
        let mut app = app();
        type_text(&mut app, "keep me");
        app.submit_task();

        app.complete_task(Uuid::new_v4());
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].text, "keep me");
    }

    #[test]
    fn test_complete_selected_clamps_selection() {
        let mut app = app();
        for text in ["one", "two"] {
            type_text(&mut app, text);
            app.submit_task();
        }
        assert_eq!(app.selected, 1);

        app.update(ctrl('d')).expect("update failed");
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.selected, 0);

        app.update(ctrl('d')).expect("update failed");
        assert!(app.tasks.is_empty());
        assert_eq!(app.selected, 0);

        // Nothing left to complete.
        app.update(ctrl('d')).expect("update failed");
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn test_toggle_theme_flips_palette_and_round_trips() {
        let mut app = app();
        let light = app.theme;

        app.update(ctrl('t')).expect("update failed");
        assert_eq!(app.preset, ThemePreset::Dark);
        assert_ne!(app.theme.base.canvas, light.base.canvas);
        assert_ne!(app.theme.base.text, light.base.text);

        app.toggle_theme();
        assert_eq!(app.preset, ThemePreset::Light);
        assert_eq!(app.theme, light);
    }

    #[test]
    fn test_toggle_theme_leaves_tasks_unchanged() {
        let mut app = app();
        type_text(&mut app, "Write report");
        app.submit_task();

        app.toggle_theme();
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].text, "Write report");
    }

    #[test]
    fn test_cursor_editing_in_middle_of_input() {
        let mut app = app();
        type_text(&mut app, "helo");
        app.update(key(KeyCode::Left)).expect("update failed");
        app.insert_char('l');
        assert_eq!(app.pending_input, "hello");
        assert_eq!(app.cursor, 4);

        app.update(key(KeyCode::Home)).expect("update failed");
        app.delete_char_forward();
        assert_eq!(app.pending_input, "ello");

        app.update(key(KeyCode::End)).expect("update failed");
        app.delete_char_back();
        assert_eq!(app.pending_input, "ell");
    }

    #[test]
    fn test_cursor_handles_multibyte_text() {
        let mut app = app();
        type_text(&mut app, "café");
        assert_eq!(app.cursor, 4);
        app.delete_char_back();
        assert_eq!(app.pending_input, "caf");
    }

    #[test]
    fn test_backspace_at_start_is_a_no_op() {
        let mut app = app();
        app.delete_char_back();
        assert_eq!(app.pending_input, "");
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_selection_navigation_stays_in_bounds() {
        let mut app = app();
        for text in ["a", "b", "c"] {
            type_text(&mut app, text);
            app.submit_task();
        }

        app.update(key(KeyCode::Down)).expect("update failed");
        assert_eq!(app.selected, 2);
        app.update(key(KeyCode::Up)).expect("update failed");
        app.update(key(KeyCode::Up)).expect("update failed");
        app.update(key(KeyCode::Up)).expect("update failed");
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.update(key(KeyCode::Esc)).expect("update failed");
        assert!(app.should_quit());

        let mut app = App::with_preset(ThemePreset::Dark);
        app.update(ctrl('c')).expect("update failed");
        assert!(app.should_quit());
    }

    #[test]
    fn test_clamped_scroll_offset_follows_selection() {
        let mut app = app();
        for index in 0..10 {
            type_text(&mut app, &format!("task {index}"));
            app.submit_task();
        }
        assert_eq!(app.selected, 9);

        // Selection at the bottom scrolls the window down.
        assert_eq!(app.clamped_scroll_offset(4), 6);

        for _ in 0..9 {
            app.select_previous();
        }
        assert_eq!(app.clamped_scroll_offset(4), 0);
    }

    #[test]
    fn test_clamped_scroll_offset_empty_list() {
        let mut app = app();
        assert_eq!(app.clamped_scroll_offset(4), 0);
        assert_eq!(app.clamped_scroll_offset(0), 0);
    }

    #[test]
    fn test_mouse_click_dispatches_hit_message() {
        let mut app = app();
        type_text(&mut app, "clickable");
        app.submit_task();
        let id = app.tasks[0].id;

        app.hit_test_map.push((
            Rect::new(0, 5, 20, 1),
            Message::CompleteTask(id),
        ));

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 5,
            modifiers: KeyModifiers::empty(),
        };
        app.update(Message::Mouse(click)).expect("update failed");
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn test_mouse_click_outside_hits_nothing() {
        let mut app = app();
        type_text(&mut app, "still here");
        app.submit_task();
        let id = app.tasks[0].id;
        app.hit_test_map
            .push((Rect::new(0, 5, 20, 1), Message::CompleteTask(id)));

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 9,
            modifiers: KeyModifiers::empty(),
        };
        app.update(Message::Mouse(click)).expect("update failed");
        assert_eq!(app.tasks.len(), 1);
    }

    #[test]
    fn test_resize_updates_viewport() {
        let mut app = app();
        app.update(Message::Resize(120, 40)).expect("update failed");
        assert_eq!(app.viewport, (120, 40));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut app = app();
        assert!(app.tasks.is_empty());
        assert_eq!(app.preset, ThemePreset::Light);

        type_text(&mut app, "Write report");
        app.update(key(KeyCode::Enter)).expect("update failed");
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].text, "Write report");

        app.update(ctrl('t')).expect("update failed");
        assert_eq!(app.preset, ThemePreset::Dark);
        assert_eq!(app.tasks.len(), 1);

        let id = app.tasks[0].id;
        app.update(Message::CompleteTask(id)).expect("update failed");
        assert!(app.tasks.is_empty());
    }
}
