use ropey::Rope;

/// A text buffer backed by a rope data structure.
///
/// This is the content model behind [`SharedEditor`](super::SharedEditor).
/// Edits happen at the cursor, which is a char index into the rope; every
/// line break ropey recognises (`\n`, `\r\n`, `\r`, U+2028, ...) is one or two
/// plain chars to the cursor. Whole-content replacement via
/// [`set_text`](Self::set_text) keeps the cursor where it was when the new
/// content is long enough.
pub struct EditorBuffer {
    rope: Rope,
    cursor: usize,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: 0,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the whole content.
    ///
    /// Returns `false` (and leaves the buffer untouched) when `text` equals
    /// the current content.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.rope == text {
            return false;
        }
        self.rope = Rope::from_str(text);
        self.cursor = self.cursor.min(self.rope.len_chars());
        true
    }

    /// Insert a string at the cursor position and move the cursor past it.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let before = self.rope.len_chars();
        self.rope.insert(self.cursor, s);
        self.cursor += self.rope.len_chars() - before;
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// A `\r\n` pair goes as one line break. Returns `true` if anything was
    /// deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let mut start = self.cursor - 1;
        if start > 0 && self.rope.char(start) == '\n' && self.rope.char(start - 1) == '\r' {
            start -= 1;
        }
        self.rope.remove(start..self.cursor);
        self.cursor = start;
        true
    }

    /// Move the cursor to the end of the buffer.
    pub fn move_to_end(&mut self) {
        self.cursor = self.rope.len_chars();
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .finish()
    }
}
