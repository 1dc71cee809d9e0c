use std::path::Path;

use crate::actions;
use crate::cursor::CursorState;
use crate::history::{Edit, EditHistory};
use crate::model::{Category, TextRange};
use crate::overlay::HighlightOverlay;
use crate::registry::SpanAssignment;
use crate::session::{AnnotationSession, ExportOutcome};

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    Visual,
    CategoryPicker,
    Input,
    Help,
    Message,
}

/// Focus area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Sidebar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Modal message shown until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

/// Platform-agnostic application state
pub struct App {
    pub session: AnnotationSession,
    pub overlay: HighlightOverlay,
    pub cursor: CursorState,
    pub history: EditHistory,
    pub mode: Mode,
    pub focus: Focus,
    pub running: bool,

    // Selection state: byte offset where visual mode started
    pub selection_anchor: Option<usize>,

    // Sidebar state
    pub sidebar_selected: usize,

    // Save path input
    pub input_buffer: String,

    // Picker state
    pub category_selected: usize,

    pub status_message: Option<String>,
    pub notice: Option<Notice>,
}

impl App {
    pub fn new() -> Self {
        Self {
            session: AnnotationSession::new(),
            overlay: HighlightOverlay::new(),
            cursor: CursorState::new(),
            history: EditHistory::new(),
            mode: Mode::Normal,
            focus: Focus::Editor,
            running: true,

            selection_anchor: None,

            sidebar_selected: 0,

            input_buffer: String::new(),

            category_selected: 0,

            status_message: None,
            notice: None,
        }
    }

    /// Replace the buffer with `text`, e.g. a transcript loaded from disk
    pub fn load_text(&mut self, text: &str) {
        self.session.set_text(normalize_newlines(text));
        self.overlay.clear();
        self.cursor.set_content(self.session.text());
        self.history.clear();
        self.selection_anchor = None;
    }

    /// Get cursor position as (row, col)
    pub fn cursor_pos(&self) -> (usize, usize) {
        self.cursor.cursor()
    }

    // Cursor movement methods
    pub fn move_up(&mut self) {
        self.cursor.move_up();
    }

    pub fn move_down(&mut self) {
        self.cursor.move_down();
    }

    pub fn move_left(&mut self) {
        self.cursor.move_left();
    }

    pub fn move_right(&mut self) {
        self.cursor.move_right();
    }

    pub fn move_to_start(&mut self) {
        self.cursor.move_to_start();
    }

    pub fn move_to_end(&mut self) {
        self.cursor.move_to_end();
    }

    pub fn move_to_top(&mut self) {
        self.cursor.move_to_top();
    }

    pub fn move_to_bottom(&mut self) {
        self.cursor.move_to_bottom();
    }

    pub fn move_word_forward(&mut self) {
        self.cursor.move_word_forward();
    }

    pub fn move_word_end(&mut self) {
        self.cursor.move_word_end();
    }

    pub fn move_word_back(&mut self) {
        self.cursor.move_word_back();
    }

    /// Enter visual/selection mode anchored at the cursor
    pub fn enter_visual_mode(&mut self) {
        self.mode = Mode::Visual;
        self.selection_anchor = Some(self.cursor.offset());
    }

    pub fn exit_visual_mode(&mut self) {
        self.mode = Mode::Normal;
        self.selection_anchor = None;
    }

    /// Current selection between the anchor and the cursor
    pub fn selection_range(&self) -> Option<TextRange> {
        let anchor = self.selection_anchor?;
        let range = TextRange::new(anchor, self.cursor.offset());
        (!range.is_empty()).then_some(range)
    }

    /// Tag the current selection
    pub fn assign_category(&mut self, category: Category) {
        let ops = self.session.assign(self.selection_range(), category);
        if !ops.is_empty() {
            self.overlay.apply_all(ops);
            self.set_status(&format!("Tagged as {}", category));
        }
    }

    /// Remove the tag from the current selection
    pub fn clear_category(&mut self) {
        match self.session.clear(self.selection_range()) {
            Ok(ops) => {
                if !ops.is_empty() {
                    self.overlay.apply_all(ops);
                    self.set_status("Tag cleared");
                }
            }
            Err(e) => self.show_notice(NoticeKind::Error, "Error clearing tag", &e.to_string()),
        }
    }

    /// Open the category picker for the current selection
    pub fn open_category_picker(&mut self) {
        if self.selection_range().is_some() {
            self.mode = Mode::CategoryPicker;
        }
    }

    pub fn picker_next(&mut self) {
        self.category_selected = (self.category_selected + 1) % Category::all().len();
    }

    pub fn picker_prev(&mut self) {
        let len = Category::all().len();
        self.category_selected = if self.category_selected == 0 {
            len - 1
        } else {
            self.category_selected - 1
        };
    }

    /// Assign the highlighted picker entry and return to the selection
    pub fn confirm_picker(&mut self) {
        let category = Category::all()[self.category_selected];
        self.mode = Mode::Visual;
        self.assign_category(category);
    }

    pub fn cancel_picker(&mut self) {
        self.mode = Mode::Visual;
    }

    /// Prompt for a save destination, pre-filled with `suggested`
    pub fn start_save(&mut self, suggested: &str) {
        self.selection_anchor = None;
        self.input_buffer = suggested.to_string();
        self.mode = Mode::Input;
    }

    /// Export to `destination`; `None` cancels.
    ///
    /// On success the buffer, registry and highlights are all reset. On
    /// failure nothing changes so the save can be retried.
    pub fn save_to(&mut self, destination: Option<&Path>) {
        self.input_buffer.clear();
        self.mode = Mode::Normal;

        match self.session.export(destination) {
            Ok(ExportOutcome::Cancelled) => self.set_status("Save cancelled"),
            Ok(ExportOutcome::Saved { path, rows }) => {
                self.overlay.clear();
                self.cursor.set_content(self.session.text());
                self.history.clear();
                self.selection_anchor = None;
                self.sidebar_selected = 0;
                self.set_status(&format!("Saved {} rows to {}", rows, path.display()));
                self.show_notice(NoticeKind::Info, "Success", "CSV file saved successfully!");
            }
            Err(e) => self.show_notice(NoticeKind::Error, "Error saving file", &e.to_string()),
        }
    }

    pub fn show_notice(&mut self, kind: NoticeKind, title: &str, body: &str) {
        self.notice = Some(Notice {
            kind,
            title: title.to_string(),
            body: body.to_string(),
        });
        self.mode = Mode::Message;
    }

    /// Close the modal message and go back to where the user was
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        self.mode = if self.selection_anchor.is_some() {
            Mode::Visual
        } else {
            Mode::Normal
        };
    }

    // Text editing

    pub fn enter_insert_mode(&mut self) {
        self.selection_anchor = None;
        self.mode = Mode::Insert;
    }

    /// Insert text at the cursor, keeping highlights aligned
    pub fn insert_str(&mut self, text: &str) {
        let text = normalize_newlines(text);
        if text.is_empty() {
            return;
        }
        let at = self.apply_insert(self.cursor.offset(), &text);
        self.history.push(Edit::Insert { offset: at, text });
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    pub fn newline(&mut self) {
        self.insert_str("\n");
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        let offset = self.cursor.offset();
        let Some(prev) = self.session.text()[..offset].chars().next_back() else {
            return;
        };
        self.delete_range(TextRange::new(offset - prev.len_utf8(), offset));
    }

    /// Delete the character under the cursor
    pub fn delete_forward(&mut self) {
        let offset = self.cursor.offset();
        let Some(next) = self.session.text()[offset..].chars().next() else {
            return;
        };
        self.delete_range(TextRange::new(offset, offset + next.len_utf8()));
    }

    fn delete_range(&mut self, range: TextRange) {
        let text = self.apply_delete(range);
        self.history.push(Edit::Delete {
            offset: range.start_offset,
            text,
        });
    }

    /// Revert the last buffer edit
    pub fn undo(&mut self) {
        let Some(edit) = self.history.pop_undo() else {
            self.set_status("Nothing to undo");
            return;
        };
        match edit {
            Edit::Insert { offset, text } => {
                self.apply_delete(TextRange::new(offset, offset + text.len()));
            }
            Edit::Delete { offset, text } => {
                self.apply_insert(offset, &text);
            }
        }
    }

    /// Reapply the last undone edit
    pub fn redo(&mut self) {
        let Some(edit) = self.history.pop_redo() else {
            self.set_status("Nothing to redo");
            return;
        };
        match edit {
            Edit::Insert { offset, text } => {
                self.apply_insert(offset, &text);
            }
            Edit::Delete { offset, text } => {
                self.apply_delete(TextRange::new(offset, offset + text.len()));
            }
        }
    }

    /// Insert without recording; the cursor ends after the text
    fn apply_insert(&mut self, offset: usize, text: &str) -> usize {
        let at = self.session.insert_str(offset, text);
        self.overlay.on_insert(at, text.len());
        self.cursor.refresh(self.session.text());
        self.cursor.set_cursor_offset(at + text.len());
        at
    }

    /// Delete without recording; the cursor ends at the start of the range
    fn apply_delete(&mut self, range: TextRange) -> String {
        let removed = self.session.delete(range);
        self.overlay.on_delete(range);
        self.cursor.refresh(self.session.text());
        self.cursor.set_cursor_offset(range.start_offset);
        removed
    }

    // Sidebar

    /// Currently highlighted registry entry
    pub fn selected_entry(&self) -> Option<&SpanAssignment> {
        self.session.registry().iter().nth(self.sidebar_selected)
    }

    /// Move to the next tagged span
    pub fn next_entry(&mut self) {
        let count = self.session.registry().len();
        if count > 0 {
            self.sidebar_selected = (self.sidebar_selected + 1) % count;
            self.jump_to_selected_entry();
        }
    }

    /// Move to the previous tagged span
    pub fn prev_entry(&mut self) {
        let count = self.session.registry().len();
        if count > 0 {
            self.sidebar_selected = if self.sidebar_selected == 0 {
                count - 1
            } else {
                self.sidebar_selected - 1
            };
            self.jump_to_selected_entry();
        }
    }

    fn jump_to_selected_entry(&mut self) {
        if let Some(offset) = actions::entry_offset_by_index(&self.session, self.sidebar_selected) {
            self.cursor.set_cursor_offset(offset);
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Toggle focus between editor and sidebar
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Editor => Focus::Sidebar,
            Focus::Sidebar => Focus::Editor,
        };
    }

    /// Get content lines for rendering
    pub fn content_lines(&self) -> Vec<&str> {
        self.session.text().split('\n').collect()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with(text: &str) -> App {
        let mut app = App::new();
        app.load_text(text);
        app
    }

    /// Select `needle` by moving the cursor like a user would
    fn select(app: &mut App, needle: &str) {
        let start = app.session.text().find(needle).unwrap();
        app.exit_visual_mode();
        app.cursor.set_cursor_offset(start);
        app.enter_visual_mode();
        app.cursor.set_cursor_offset(start + needle.len());
    }

    #[test]
    fn test_assign_paints_selection() {
        let mut app = app_with("I went to the store");
        select(&mut app, "store");
        app.assign_category(Category::Place);

        assert_eq!(app.session.registry().get("store"), Some(Category::Place));
        assert_eq!(app.overlay.category_at(14), Some(Category::Place));
        assert_eq!(app.overlay.category_at(13), None);
        assert_eq!(app.mode, Mode::Visual);
    }

    #[test]
    fn test_assign_without_selection_is_silent() {
        let mut app = app_with("I went to the store");
        app.assign_category(Category::Place);
        app.enter_visual_mode();
        app.assign_category(Category::Place);

        assert!(app.session.registry().is_empty());
        assert!(app.overlay.is_empty());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_retag_replaces_highlight() {
        let mut app = app_with("I went to the store");
        select(&mut app, "went");
        app.assign_category(Category::Event);
        app.assign_category(Category::Time);

        assert_eq!(app.overlay.segments().len(), 1);
        assert_eq!(app.overlay.category_at(2), Some(Category::Time));
    }

    #[test]
    fn test_clear_untagged_shows_error() {
        let mut app = app_with("I went to the store");
        select(&mut app, "store");
        app.clear_category();

        assert_eq!(app.mode, Mode::Message);
        let notice = app.notice.clone().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.title, "Error clearing tag");
        assert!(notice.body.contains("including whitespace"));

        app.dismiss_notice();
        assert_eq!(app.mode, Mode::Visual);
    }

    #[test]
    fn test_clear_removes_highlight() {
        let mut app = app_with("I went to the store");
        select(&mut app, "store");
        app.assign_category(Category::Place);
        app.clear_category();

        assert!(app.session.registry().is_empty());
        assert!(app.overlay.is_empty());
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_picker_assigns_highlighted_category() {
        let mut app = app_with("then we left");
        select(&mut app, "then");
        app.open_category_picker();
        assert_eq!(app.mode, Mode::CategoryPicker);

        app.picker_prev();
        app.confirm_picker();
        assert_eq!(app.session.registry().get("then"), Some(Category::Repetitions));
        assert_eq!(app.mode, Mode::Visual);
    }

    #[test]
    fn test_insert_keeps_highlights_aligned() {
        let mut app = app_with("the store");
        select(&mut app, "store");
        app.assign_category(Category::Place);
        app.exit_visual_mode();

        app.cursor.set_cursor_offset(0);
        app.enter_insert_mode();
        app.insert_str("At ");
        assert_eq!(app.session.text(), "At the store");
        assert_eq!(app.overlay.category_at(7), Some(Category::Place));
        assert_eq!(app.overlay.category_at(6), None);

        app.backspace();
        assert_eq!(app.session.text(), "Atthe store");
        assert_eq!(app.overlay.category_at(6), Some(Category::Place));
    }

    #[test]
    fn test_paste_normalises_newlines() {
        let mut app = App::new();
        app.enter_insert_mode();
        app.insert_str("one\r\ntwo");
        assert_eq!(app.session.text(), "one\ntwo");
        assert_eq!(app.cursor_pos(), (1, 3));

        app.delete_forward();
        assert_eq!(app.session.text(), "one\ntwo");
        app.cursor.set_cursor_offset(3);
        app.delete_forward();
        assert_eq!(app.session.text(), "onetwo");
    }

    #[test]
    fn test_save_resets_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut app = app_with("I went to the {store}");
        select(&mut app, "went");
        app.assign_category(Category::Event);
        app.start_save(path.to_str().unwrap());
        assert_eq!(app.mode, Mode::Input);

        app.save_to(Some(path.as_path()));
        assert!(app.session.text().is_empty());
        assert!(app.session.registry().is_empty());
        assert!(app.overlay.is_empty());
        assert_eq!(app.cursor_pos(), (0, 0));
        assert_eq!(
            app.notice.as_ref().map(|n| n.body.as_str()),
            Some("CSV file saved successfully!")
        );

        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv, "Word/Phrase,Category\r\nwent,Event\r\nstore,nested\r\n");
    }

    #[test]
    fn test_failed_save_keeps_work() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("no-such-dir").join("out.csv");

        let mut app = app_with("I went home");
        select(&mut app, "home");
        app.assign_category(Category::Place);
        app.save_to(Some(bad.as_path()));

        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
        assert_eq!(app.session.text(), "I went home");
        assert_eq!(app.session.registry().len(), 1);
        assert!(!app.overlay.is_empty());
    }

    #[test]
    fn test_cancelled_save() {
        let mut app = app_with("I went home");
        app.start_save("");
        app.save_to(None);

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("Save cancelled"));
        assert_eq!(app.session.text(), "I went home");
    }

    #[test]
    fn test_sidebar_jumps_to_entries() {
        let mut app = app_with("first place\nsecond time");
        select(&mut app, "place");
        app.assign_category(Category::Place);
        select(&mut app, "time");
        app.assign_category(Category::Time);
        app.exit_visual_mode();

        app.next_entry();
        assert_eq!(app.selected_entry().map(|e| e.text.as_str()), Some("time"));
        assert_eq!(app.cursor_pos(), (1, 7));

        app.prev_entry();
        assert_eq!(app.cursor_pos(), (0, 6));
    }

    #[test]
    fn test_undo_backspace_inside_highlight() {
        let mut app = app_with("the store");
        select(&mut app, "store");
        app.assign_category(Category::Place);
        app.exit_visual_mode();

        app.cursor.set_cursor_offset(7);
        app.enter_insert_mode();
        app.backspace();
        assert_eq!(app.session.text(), "the stre");
        assert_eq!(app.overlay.category_at(7), Some(Category::Place));
        assert_eq!(app.overlay.category_at(8), None);

        app.undo();
        assert_eq!(app.session.text(), "the store");
        assert_eq!(app.overlay.category_at(4), Some(Category::Place));
        assert_eq!(app.overlay.category_at(8), Some(Category::Place));
        assert_eq!(app.overlay.category_at(3), None);
        assert_eq!(app.cursor.offset(), 7);

        app.redo();
        assert_eq!(app.session.text(), "the stre");
        assert_eq!(app.cursor.offset(), 6);
    }

    #[test]
    fn test_undo_typing_run() {
        let mut app = app_with("we left");
        app.cursor.set_cursor_offset(2);
        app.enter_insert_mode();
        for c in " all".chars() {
            app.insert_char(c);
        }
        assert_eq!(app.session.text(), "we all left");

        app.undo();
        assert_eq!(app.session.text(), "we left");
        assert_eq!(app.cursor.offset(), 2);

        app.undo();
        assert_eq!(app.status_message.as_deref(), Some("Nothing to undo"));
    }

    #[test]
    fn test_load_clears_history() {
        let mut app = App::new();
        app.insert_str("draft");
        app.load_text("transcript");

        app.undo();
        assert_eq!(app.session.text(), "transcript");
    }
}
