//! The document text, held in a rope.
//!
//! ## Learning: Why a Rope
//!
//! Insert mode edits the document on every keystroke and the status bar
//! turns the cursor offset back into a line number on every render.
//! `ropey` answers both in logarithmic time, where a `String` would be
//! rescanned from the start.
//!
//! The rope is built without `unicode_lines`, so `\n` is the only line
//! break. A lone `\r` stays an ordinary character on its line.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use crate::{BufferError, BufferResult};

/// Text of the active file. Offsets count `char`s, never bytes.
///
/// The buffer also remembers whether it was edited since its text was
/// last loaded or marked saved.
///
/// ```
/// use oxidevim_buffer::TextBuffer;
///
/// let mut buffer = TextBuffer::from("fn main() {}\n");
/// buffer.insert(3, "my_").unwrap();
/// assert_eq!(buffer.text(), "fn my_main() {}\n");
/// assert_eq!(buffer.len_lines(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
    modified: bool,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows when the rope fits in one chunk, allocates otherwise.
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Line `line_idx` (0-based) with its `\n`, if it has one.
    pub fn line(&self, line_idx: usize) -> BufferResult<Cow<'_, str>> {
        self.ensure_line(line_idx)?;
        Ok(self.rope.line(line_idx).into())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Never zero. A trailing `\n` opens one more, empty, line.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Chars on line `line_idx` (0-based), not counting its `\n`.
    pub fn line_len(&self, line_idx: usize) -> BufferResult<usize> {
        self.ensure_line(line_idx)?;
        let line = self.rope.line(line_idx);
        let chars = line.len_chars();
        let ends_with_newline = chars > 0 && line.char(chars - 1) == '\n';
        Ok(chars - usize::from(ends_with_newline))
    }

    /// Offset of the first char of line `line_idx` (0-based).
    pub fn line_to_char(&self, line_idx: usize) -> BufferResult<usize> {
        self.ensure_line(line_idx)?;
        Ok(self.rope.line_to_char(line_idx))
    }

    /// 0-based line holding `char_idx`. The end-of-text offset is on the
    /// last line.
    pub fn char_to_line(&self, char_idx: usize) -> BufferResult<usize> {
        self.ensure_offset(char_idx)?;
        Ok(self.rope.char_to_line(char_idx))
    }

    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        self.ensure_offset(char_idx)?;
        if !text.is_empty() {
            self.rope.insert(char_idx, text);
            self.modified = true;
        }
        Ok(())
    }

    /// Removes `range` and hands back what was there.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        if range.start > range.end {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        self.ensure_offset(range.end)?;

        let removed = self.rope.slice(range.clone()).to_string();
        if !removed.is_empty() {
            self.rope.remove(range);
            self.modified = true;
        }
        Ok(removed)
    }

    /// Loads `text` in place of the current contents. A freshly loaded
    /// buffer is unmodified.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.modified = false;
    }

    /// True after an insert or delete that changed the text, until the
    /// next `set_text` or `mark_saved`.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    fn ensure_line(&self, line_idx: usize) -> BufferResult<()> {
        let lines = self.len_lines();
        if line_idx < lines {
            Ok(())
        } else {
            Err(BufferError::LineOutOfBounds {
                line: line_idx,
                lines,
            })
        }
    }

    fn ensure_offset(&self, char_idx: usize) -> BufferResult<()> {
        if char_idx <= self.len_chars() {
            Ok(())
        } else {
            Err(BufferError::InvalidCharIndex(char_idx))
        }
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            modified: false,
        }
    }
}

impl From<String> for TextBuffer {
    fn from(text: String) -> Self {
        text.as_str().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_len_excludes_newline() {
        let buffer = TextBuffer::from("ab\ncde\n");
        assert_eq!(buffer.len_lines(), 3);
        assert_eq!(buffer.line_len(0).unwrap(), 2);
        assert_eq!(buffer.line_len(1).unwrap(), 3);
        assert_eq!(buffer.line_len(2).unwrap(), 0);
        assert!(matches!(
            buffer.line_len(3),
            Err(BufferError::LineOutOfBounds { line: 3, lines: 3 })
        ));
    }

    #[test]
    fn test_carriage_return_is_not_a_line_break() {
        let buffer = TextBuffer::from("a\r\nb\rc");
        assert_eq!(buffer.len_lines(), 2);
        assert_eq!(buffer.line_len(0).unwrap(), 2);
        assert_eq!(buffer.line_len(1).unwrap(), 3);
    }

    #[test]
    fn test_char_to_line_at_end() {
        let buffer = TextBuffer::from("one\ntwo");
        assert_eq!(buffer.char_to_line(0).unwrap(), 0);
        assert_eq!(buffer.char_to_line(3).unwrap(), 0);
        assert_eq!(buffer.char_to_line(4).unwrap(), 1);
        assert_eq!(buffer.char_to_line(7).unwrap(), 1);
        assert!(buffer.char_to_line(8).is_err());
    }

    #[test]
    fn test_unicode_offsets_are_chars() {
        let mut buffer = TextBuffer::from("héllo");
        assert_eq!(buffer.len_chars(), 5);
        buffer.insert(2, "🦀").unwrap();
        assert_eq!(buffer.text(), "hé🦀llo");
        assert_eq!(buffer.delete(2..3).unwrap(), "🦀");
    }

    #[test]
    fn test_rejected_edits_leave_text_alone() {
        let mut buffer = TextBuffer::from("abc");
        assert!(matches!(
            buffer.delete(2..1),
            Err(BufferError::InvalidRange { start: 2, end: 1 })
        ));
        assert!(matches!(
            buffer.insert(4, "x"),
            Err(BufferError::InvalidCharIndex(4))
        ));
        assert!(buffer.delete(1..9).is_err());
        assert_eq!(buffer.text(), "abc");
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_line_keeps_its_newline() {
        let buffer = TextBuffer::from("fn main() {\n}\n");
        assert_eq!(buffer.line(0).unwrap(), "fn main() {\n");
        assert_eq!(buffer.line(1).unwrap(), "}\n");
        assert_eq!(buffer.line(2).unwrap(), "");
        assert!(buffer.line(3).is_err());
    }

    #[test]
    fn test_modified_tracking() {
        let mut buffer = TextBuffer::from("ab");
        buffer.insert(1, "").unwrap();
        buffer.delete(1..1).unwrap();
        assert!(!buffer.is_modified());

        buffer.insert(1, "x").unwrap();
        assert!(buffer.is_modified());
        buffer.mark_saved();
        assert!(!buffer.is_modified());

        buffer.delete(0..1).unwrap();
        assert!(buffer.is_modified());
        buffer.set_text("fresh");
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_set_text_replaces_everything() {
        let mut buffer = TextBuffer::from("old");
        buffer.set_text("new\ntext");
        assert_eq!(buffer.text(), "new\ntext");
        assert_eq!(buffer.len_lines(), 2);
        assert!(!buffer.is_modified());
    }
}
