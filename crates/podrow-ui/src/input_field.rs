//! Text input with a character-indexed cursor, used for pod password fields.

/// Single-line text input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    /// Current text content.
    pub text: String,
    /// Cursor position as character index.
    pub cursor_pos: usize,
    /// Mask the text when displayed.
    pub password_mode: bool,
    /// Disabled fields ignore edits.
    pub disabled: bool,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty masked field.
    pub fn password() -> Self {
        Self {
            password_mode: true,
            ..Self::default()
        }
    }

    /// Text as it should be drawn (masked in password mode).
    pub fn display_text(&self) -> String {
        if self.password_mode {
            "*".repeat(self.text.chars().count())
        } else {
            self.text.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        if self.disabled {
            return;
        }
        let byte_pos = self.byte_index(self.cursor_pos);
        self.text.insert(byte_pos, ch);
        self.cursor_pos += 1;
    }

    /// Insert a whole string at the cursor.
    pub fn insert_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.insert(ch);
        }
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.disabled || self.cursor_pos == 0 {
            return;
        }
        self.cursor_pos -= 1;
        let byte_pos = self.byte_index(self.cursor_pos);
        if byte_pos < self.text.len() {
            let ch_len = self.text[byte_pos..]
                .chars()
                .next()
                .map_or(0, |c| c.len_utf8());
            self.text.drain(byte_pos..byte_pos + ch_len);
        }
    }

    /// Move the cursor one character left or right.
    pub fn move_cursor(&mut self, right: bool) {
        if right {
            self.cursor_pos = (self.cursor_pos + 1).min(self.text.chars().count());
        } else {
            self.cursor_pos = self.cursor_pos.saturating_sub(1);
        }
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor_pos = self.text.chars().count();
    }

    /// Empty the field.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults() {
        let f = InputField::new();
        assert!(f.text.is_empty());
        assert_eq!(f.cursor_pos, 0);
        assert!(!f.password_mode);
        assert!(!f.disabled);
    }

    #[test]
    fn insert_multiple_chars() {
        let mut f = InputField::new();
        f.insert_str("Hello");
        assert_eq!(f.text, "Hello");
        assert_eq!(f.cursor_pos, 5);
    }

    #[test]
    fn backspace_removes_char() {
        let mut f = InputField::new();
        f.insert('A');
        f.insert('B');
        f.backspace();
        assert_eq!(f.text, "A");
        assert_eq!(f.cursor_pos, 1);
    }

    #[test]
    fn backspace_at_start_does_nothing() {
        let mut f = InputField::new();
        f.backspace();
        assert!(f.is_empty());
        assert_eq!(f.cursor_pos, 0);
    }

    #[test]
    fn insert_in_middle() {
        let mut f = InputField::new();
        f.insert_str("ac");
        f.move_cursor(false);
        f.insert('b');
        assert_eq!(f.text, "abc");
        assert_eq!(f.cursor_pos, 2);
    }

    #[test]
    fn unicode_masking_counts_chars() {
        let mut f = InputField::password();
        f.insert('\u{00E9}');
        f.insert('\u{1F600}');
        assert_eq!(f.display_text(), "**");
        f.backspace();
        assert_eq!(f.text, "\u{00E9}");
    }

    #[test]
    fn disabled_ignores_edits() {
        let mut f = InputField::new();
        f.set_text("pw");
        f.disabled = true;
        f.insert('x');
        f.backspace();
        assert_eq!(f.text, "pw");
    }

    #[test]
    fn clear_resets_cursor() {
        let mut f = InputField::new();
        f.set_text("secret");
        assert_eq!(f.cursor_pos, 6);
        f.clear();
        assert!(f.is_empty());
        assert_eq!(f.cursor_pos, 0);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut f = InputField::new();
        f.set_text("ab");
        f.move_cursor(true);
        assert_eq!(f.cursor_pos, 2);
        f.move_cursor(false);
        f.move_cursor(false);
        f.move_cursor(false);
        assert_eq!(f.cursor_pos, 0);
    }
}
