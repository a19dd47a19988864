//! Single-line text field used by the forms and the task draft.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// Mask character shown for hidden input.
const MASK: char = '•';

/// Single-line editable text with a char-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    cursor: usize,
    /// Hidden fields render as a mask unless revealed.
    masked: bool,
    revealed: bool,
}

impl TextField {
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_hidden(&self) -> bool {
        self.masked && !self.revealed
    }

    /// Shows or hides a masked field's content.
    pub fn toggle_reveal(&mut self) {
        if self.masked {
            self.revealed = !self.revealed;
        }
    }

    /// Text as it should be drawn.
    pub fn display(&self) -> String {
        if self.is_hidden() {
            std::iter::repeat_n(MASK, self.value.chars().count()).collect()
        } else {
            self.value.clone()
        }
    }

    /// Display width of the text before the cursor.
    pub fn cursor_offset(&self) -> u16 {
        let shown = self.display();
        let end = char_to_byte_index(&shown, self.cursor);
        shown[..end].width() as u16
    }

    /// Applies an editing key. Returns false for keys the field ignores.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        if matches!(key.kind, KeyEventKind::Release) {
            return false;
        }
        match key.code {
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let at = char_to_byte_index(&self.value, self.cursor);
                self.value.insert(at, ch);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = char_to_byte_index(&self.value, self.cursor);
                    self.value.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.value.chars().count() {
                    let at = char_to_byte_index(&self.value, self.cursor);
                    self.value.remove(at);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.chars().count(),
            _ => return false,
        }
        true
    }
}

fn char_to_byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(field: &mut TextField, text: &str) {
        for ch in text.chars() {
            field.input(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn test_editing_in_the_middle() {
        let mut field = TextField::default();
        type_str(&mut field, "héllo");
        field.input(key(KeyCode::Left));
        field.input(key(KeyCode::Left));
        field.input(key(KeyCode::Backspace));
        assert_eq!(field.value(), "hélo");
        type_str(&mut field, "L");
        assert_eq!(field.value(), "héLlo");
        field.input(key(KeyCode::Home));
        field.input(key(KeyCode::Delete));
        assert_eq!(field.value(), "éLlo");
    }

    #[test]
    fn test_control_chords_are_not_text() {
        let mut field = TextField::default();
        let handled = field.input(KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CONTROL));
        assert!(!handled);
        assert!(field.is_empty());
    }

    #[test]
    fn test_masked_field_reveals_on_toggle() {
        let mut field = TextField::masked();
        type_str(&mut field, "abc");
        assert_eq!(field.display(), "•••");
        field.toggle_reveal();
        assert_eq!(field.display(), "abc");
        assert_eq!(field.cursor_offset(), 3);
    }
}
