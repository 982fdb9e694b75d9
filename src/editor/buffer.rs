use ropey::Rope;
use unicode_width::UnicodeWidthStr;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Byte offset within the line, always on a char boundary.
    pub col: usize,
    /// Column remembered across vertical moves.
    sticky: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            sticky: col,
        }
    }

    const fn place(&mut self, line: usize, col: usize) {
        self.line = line;
        self.col = col;
        self.sticky = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::at(0, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Text shown in the editor pane.
///
/// Editing methods return `true` when the text changed, which is the signal
/// to record a history snapshot.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
        }
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let mut line = self.rope.line(line_idx).to_string();
        let content_len = line_content_len(&line);
        line.truncate(content_len);
        Some(line)
    }

    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |l| l.len())
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Display column of the cursor, counting wide characters as two cells.
    pub fn cursor_display_col(&self) -> usize {
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let col = self.cursor.col.min(line.len());
        line[..col].width()
    }

    /// Replace the whole text, keeping the cursor as close as possible.
    ///
    /// Used when the document is swapped from outside the pane (undo,
    /// upload), so it does not report a change.
    pub fn replace_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        let col = floor_char_boundary(&self.line_at(line).unwrap_or_default(), self.cursor.col);
        self.cursor.place(line, col);
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' {
            return self.split_line();
        }
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, ch);
        self.place_at_char(idx + 1);
        true
    }

    /// Insert arbitrary text (paste). Line endings are normalised to `\n`.
    pub fn insert_str(&mut self, s: &str) -> bool {
        let normalized = s.replace("\r\n", "\n").replace('\r', "\n");
        if normalized.is_empty() {
            return false;
        }
        let idx = self.cursor_char_idx();
        self.rope.insert(idx, &normalized);
        self.place_at_char(idx + normalized.chars().count());
        true
    }

    /// Break the line at the cursor (Enter).
    pub fn split_line(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, '\n');
        self.cursor.place(self.cursor.line + 1, 0);
        true
    }

    /// Backspace.
    pub fn delete_back(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return false;
        }
        if self.cursor.col == 0 {
            let prev = self.cursor.line - 1;
            let prev_len = self.line_len(prev);
            // removes "\n" or "\r\n"
            let line_start = self.rope.line_to_char(self.cursor.line);
            let prev_end = self.rope.line_to_char(prev) + self.line_char_len(prev);
            self.rope.remove(prev_end..line_start);
            self.cursor.place(prev, prev_len);
        } else {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let prev_len = line[..self.cursor.col]
                .chars()
                .next_back()
                .map_or(1, char::len_utf8);
            self.rope.remove(idx - 1..idx);
            self.cursor.place(self.cursor.line, self.cursor.col - prev_len);
        }
        true
    }

    /// Delete key.
    pub fn delete_forward(&mut self) -> bool {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            let idx = self.cursor_char_idx();
            self.rope.remove(idx..=idx);
            return true;
        }
        if self.cursor.line + 1 >= self.line_count() {
            return false;
        }
        let idx = self.cursor_char_idx();
        let next_start = self.rope.line_to_char(self.cursor.line + 1);
        self.rope.remove(idx..next_start);
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        let Cursor { line, col, sticky } = self.cursor;
        match direction {
            Direction::Left => {
                if col > 0 {
                    let text = self.line_at(line).unwrap_or_default();
                    let step = text[..col].chars().next_back().map_or(1, char::len_utf8);
                    self.cursor.place(line, col - step);
                } else if line > 0 {
                    self.cursor.place(line - 1, self.line_len(line - 1));
                }
            }
            Direction::Right => {
                let text = self.line_at(line).unwrap_or_default();
                if let Some(ch) = text[col.min(text.len())..].chars().next() {
                    self.cursor.place(line, col + ch.len_utf8());
                } else if line + 1 < self.line_count() {
                    self.cursor.place(line + 1, 0);
                }
            }
            Direction::Up if line > 0 => self.move_vertically(line - 1, sticky),
            Direction::Down if line + 1 < self.line_count() => {
                self.move_vertically(line + 1, sticky);
            }
            Direction::Up | Direction::Down => {}
        }
    }

    pub fn move_home(&mut self) {
        self.cursor.place(self.cursor.line, 0);
    }

    pub fn move_end(&mut self) {
        self.cursor
            .place(self.cursor.line, self.line_len(self.cursor.line));
    }

    /// Jump to the start of the previous word (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        let Cursor { line, col, .. } = self.cursor;
        if col == 0 {
            if line > 0 {
                self.cursor.place(line - 1, self.line_len(line - 1));
            }
            return;
        }
        let text = self.line_at(line).unwrap_or_default();
        let before = text[..col].trim_end();
        let start = before
            .char_indices()
            .rev()
            .find(|(_, c)| !is_word_char(*c))
            .map_or(0, |(i, c)| i + c.len_utf8());
        self.cursor.place(line, start);
    }

    /// Jump past the current word and following separators (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let Cursor { line, col, .. } = self.cursor;
        let text = self.line_at(line).unwrap_or_default();
        if col >= text.len() {
            if line + 1 < self.line_count() {
                self.cursor.place(line + 1, 0);
            }
            return;
        }
        let after = &text[col..];
        let word_end = after.find(|c: char| !is_word_char(c)).unwrap_or(after.len());
        let rest = &after[word_end..];
        let gap = rest.find(is_word_char).unwrap_or(rest.len());
        self.cursor.place(line, col + word_end + gap);
    }

    pub fn move_page(&mut self, rows: usize, direction: Direction) {
        let target = match direction {
            Direction::Up => self.cursor.line.saturating_sub(rows),
            Direction::Down => (self.cursor.line + rows).min(self.line_count() - 1),
            Direction::Left | Direction::Right => return,
        };
        self.move_vertically(target, self.cursor.sticky);
    }

    pub fn move_to_start(&mut self) {
        self.cursor.place(0, 0);
    }

    pub fn move_to_end(&mut self) {
        let last = self.line_count() - 1;
        self.cursor.place(last, self.line_len(last));
    }

    /// Place the cursor at a line and display column (mouse click).
    pub fn move_to_display(&mut self, line: usize, display_col: usize) {
        let line = line.min(self.line_count() - 1);
        let text = self.line_at(line).unwrap_or_default();
        let mut width = 0;
        let mut col = text.len();
        for (i, ch) in text.char_indices() {
            let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            if width + w > display_col {
                col = i;
                break;
            }
            width += w;
        }
        self.cursor.place(line, col);
    }

    fn move_vertically(&mut self, line: usize, sticky: usize) {
        let text = self.line_at(line).unwrap_or_default();
        let col = floor_char_boundary(&text, sticky);
        self.cursor = Cursor { line, col, sticky };
    }

    fn line_char_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |l| l.chars().count())
    }

    /// Put the cursor just before the char at `char_idx`.
    fn place_at_char(&mut self, char_idx: usize) {
        let line = self.rope.char_to_line(char_idx);
        let start = self.rope.line_to_char(line);
        let col = self.rope.slice(start..char_idx).len_bytes();
        self.cursor.place(line, col);
    }

    fn cursor_char_idx(&self) -> usize {
        let start = self.rope.line_to_char(self.cursor.line);
        let text = self.line_at(self.cursor.line).unwrap_or_default();
        let col = self.cursor.col.min(text.len());
        start + text[..col].chars().count()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("lines", &self.rope.len_lines())
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// Byte length of `line` without its terminator. Matches every break
/// ropey splits lines on, not just `\n`.
fn line_content_len(line: &str) -> usize {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        return stripped.len();
    }
    match line.chars().next_back() {
        Some(
            ch @ ('\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'),
        ) => line.len() - ch.len_utf8(),
        _ => line.len(),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn floor_char_boundary(s: &str, col: usize) -> usize {
    let mut col = col.min(s.len());
    while !s.is_char_boundary(col) {
        col -= 1;
    }
    col
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::from_text("");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_line_at_strips_crlf() {
        let buf = EditorBuffer::from_text("one\r\ntwo");
        assert_eq!(buf.line_at(0), Some("one".to_string()));
        assert_eq!(buf.line_at(1), Some("two".to_string()));
        assert_eq!(buf.line_at(2), None);
    }

    #[test]
    fn test_unicode_line_separators_end_lines() {
        let buf = EditorBuffer::from_text("a\u{2028}b\u{2029}c\u{85}d\u{b}e\u{c}f");
        assert_eq!(buf.line_count(), 6);
        for (idx, expected) in ["a", "b", "c", "d", "e", "f"].iter().enumerate() {
            assert_eq!(buf.line_at(idx).as_deref(), Some(*expected));
        }
    }

    #[test]
    fn test_typing_at_end_of_separator_line_stays_on_line() {
        let mut buf = EditorBuffer::from_text("a\u{2028}b");
        buf.move_end();
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
        buf.insert_char('X');
        buf.insert_char('Y');
        assert_eq!(buf.text(), "aXY\u{2028}b");
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
    }

    #[test]
    fn test_joining_across_separator_removes_it() {
        let mut buf = EditorBuffer::from_text("a\u{2028}b");
        buf.move_cursor(Direction::Down);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), Cursor::at(0, 1));

        let mut buf = EditorBuffer::from_text("a\u{2029}b");
        buf.move_end();
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "ab");
    }

    #[test]
    fn test_paste_with_separator_lands_after_it() {
        let mut buf = EditorBuffer::from_text("");
        buf.insert_str("one\u{2028}two");
        assert_eq!(buf.cursor(), Cursor::at(1, 3));
        buf.insert_char('!');
        assert_eq!(buf.text(), "one\u{2028}two!");
    }

    #[test]
    fn test_text_is_preserved_exactly() {
        let content = "# Title\r\n\n- a\n- b\n";
        assert_eq!(EditorBuffer::from_text(content).text(), content);
    }

    #[test]
    fn test_insert_char_reports_change() {
        let mut buf = EditorBuffer::from_text("ello");
        assert!(buf.insert_char('h'));
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_insert_multibyte_advances_by_bytes() {
        let mut buf = EditorBuffer::from_text("caf");
        buf.move_end();
        buf.insert_char('é');
        assert_eq!(buf.text(), "café");
        assert_eq!(buf.cursor().col, 5);
    }

    #[test]
    fn test_insert_str_multiline_moves_to_tail() {
        let mut buf = EditorBuffer::from_text("ad");
        buf.move_cursor(Direction::Right);
        assert!(buf.insert_str("b\r\nc"));
        assert_eq!(buf.text(), "ab\ncd");
        assert_eq!(buf.cursor(), Cursor::at(1, 1));
    }

    #[test]
    fn test_insert_empty_str_is_not_a_change() {
        let mut buf = EditorBuffer::from_text("x");
        assert!(!buf.insert_str(""));
    }

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to_display(0, 5);
        buf.split_line();
        assert_eq!(buf.text(), "hello\n world");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_delete_back_at_origin_is_not_a_change() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_cursor(Direction::Down);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_joins_crlf_lines() {
        let mut buf = EditorBuffer::from_text("ab\r\ncd");
        buf.move_cursor(Direction::Down);
        buf.delete_back();
        assert_eq!(buf.text(), "abcd");
    }

    #[test]
    fn test_delete_back_multibyte() {
        let mut buf = EditorBuffer::from_text("café");
        buf.move_end();
        buf.delete_back();
        assert_eq!(buf.text(), "caf");
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_end();
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_forward_at_end_is_not_a_change() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to_end();
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_left_right_wrap_across_lines() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        buf.move_end();
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_vertical_moves_keep_sticky_column() {
        let mut buf = EditorBuffer::from_text("hello\nhi\nworld");
        buf.move_to_display(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().line, 2);
        assert_eq!(buf.cursor().col, 4);
    }

    #[test]
    fn test_vertical_move_lands_on_char_boundary() {
        let mut buf = EditorBuffer::from_text("abc\néé");
        buf.move_to_display(0, 3);
        buf.move_cursor(Direction::Down);
        assert!(buf.line_at(1).unwrap().is_char_boundary(buf.cursor().col));
    }

    #[test]
    fn test_word_motion() {
        let mut buf = EditorBuffer::from_text("hello big world");
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 6);
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 10);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 6);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_page_moves_clamp() {
        let text = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut buf = EditorBuffer::from_text(&text);
        buf.move_page(10, Direction::Down);
        assert_eq!(buf.cursor().line, 10);
        buf.move_page(100, Direction::Down);
        assert_eq!(buf.cursor().line, 29);
        buf.move_page(100, Direction::Up);
        assert_eq!(buf.cursor().line, 0);
    }

    #[test]
    fn test_move_to_display_handles_wide_chars() {
        let mut buf = EditorBuffer::from_text("日本語");
        buf.move_to_display(0, 3);
        // second glyph starts at display column 2, byte 3
        assert_eq!(buf.cursor().col, 3);
        assert_eq!(buf.cursor_display_col(), 2);
    }

    #[test]
    fn test_replace_text_clamps_cursor() {
        let mut buf = EditorBuffer::from_text("line one\nline two\nline three");
        buf.move_to_end();
        buf.replace_text("short");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
        assert_eq!(buf.text(), "short");
    }
}
