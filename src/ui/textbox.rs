//! Single-line text box with a fixed 8-character sliding viewport.
//!
//! All indices are character indices, not bytes. Every mutation keeps the
//! invariants: cursor in `[0, len]`, display-window end in
//! `[min(8, len), len]`, and the cursor inside the visible slice.
//! Out-of-range movements clamp silently; they are never errors.

use crate::model::constants::{BLINK_INTERVAL_TICKS, TEXTBOX_VIEWPORT};
use crate::model::TextStyle;

use super::control::{next_control_id, ControlId};

#[derive(Debug, Clone)]
pub struct TextBox {
    id: ControlId,
    text: String,
    style: TextStyle,
    /// Cursor position as a character index into `text`.
    cursor: usize,
    /// Character index one past the last visible character.
    display_end: usize,
    focused: bool,
    // Blink is render-only state; it carries no correctness weight.
    blink_on: bool,
    blink_timer: u32,
}

impl TextBox {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            id: next_control_id(),
            text,
            style,
            cursor: len,
            display_end: len,
            focused: false,
            blink_on: true,
            blink_timer: 0,
        }
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn display_end(&self) -> usize {
        self.display_end
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Focus or defocus. Losing focus does not reset the cursor.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Re-establish the viewport invariants after any mutation. The window
    /// moves only when the cursor would leave the visible slice.
    fn normalize_window(&mut self) {
        let len = self.char_len();
        let floor = len.min(TEXTBOX_VIEWPORT);
        self.display_end = self.display_end.clamp(floor, len);
        if self.cursor > self.display_end {
            self.display_end = self.cursor;
        }
        if self.cursor < self.display_end.saturating_sub(TEXTBOX_VIEWPORT) {
            self.display_end = (self.cursor + TEXTBOX_VIEWPORT).clamp(floor, len);
        }
    }

    /// Insert a character at the cursor and advance it.
    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
        self.normalize_window();
    }

    /// Remove the character before the cursor. No-op at cursor 0.
    pub fn delete_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
        self.normalize_window();
    }

    /// Move the cursor one character left, clamped at 0.
    pub fn move_cursor_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.normalize_window();
    }

    /// Move the cursor one character right, clamped at the text length.
    pub fn move_cursor_right(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        self.cursor += 1;
        self.normalize_window();
    }

    /// The trailing slice currently visible in the viewport (at most 8
    /// characters, ending at the display-window index).
    pub fn visible_text(&self) -> String {
        let shown = self.display_end.min(TEXTBOX_VIEWPORT);
        let start = self.display_end - shown;
        self.text.chars().skip(start).take(shown).collect()
    }

    /// Cursor offset within the visible slice, in characters.
    pub fn cursor_column(&self) -> usize {
        let shown = self.display_end.min(TEXTBOX_VIEWPORT);
        let start = self.display_end - shown;
        self.cursor.saturating_sub(start)
    }

    /// Advance the blink cycle by one frame. Only ticks while focused.
    pub fn tick_blink(&mut self) {
        if !self.focused {
            return;
        }
        self.blink_timer += 1;
        if self.blink_timer >= BLINK_INTERVAL_TICKS {
            self.blink_timer = 0;
            self.blink_on = !self.blink_on;
        }
    }

    /// Whether the cursor line should be drawn this frame.
    pub fn cursor_visible(&self) -> bool {
        self.blink_on
    }
}
