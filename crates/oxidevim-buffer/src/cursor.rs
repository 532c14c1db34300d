//! Cursor model: one flat offset, viewed as line and column.
//!
//! ## Learning: Newtype Pattern
//!
//! `Position` is a struct that wraps line/column coordinates.
//! This is better than using `(usize, usize)` because:
//! - Type safety: Can't accidentally swap line and column
//! - Named fields: Self-documenting code
//! - Methods: Can add behavior specific to positions
//!
//! The flat offset inside [`Cursor`] is the only stored location. A
//! `Position` is always derived from it, so the two can never disagree.

use serde::{Deserialize, Serialize};

use crate::{BufferError, BufferResult, TextBuffer};

/// A cursor location as the user sees it.
///
/// Both line and column are 1-based. `column` may equal the line length
/// plus one, which is the slot after the last character of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters not bytes)
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position at the start of the document.
    pub const START: Position = Position { line: 1, column: 1 };

    /// Converts this position back into a flat offset.
    ///
    /// Fails if the line does not exist or the column lies beyond the slot
    /// after the line's last character.
    pub fn to_offset(&self, buffer: &TextBuffer) -> BufferResult<usize> {
        let out_of_bounds = BufferError::PositionOutOfBounds {
            line: self.line,
            column: self.column,
        };
        if self.line == 0 || self.column == 0 || self.line > buffer.len_lines() {
            return Err(out_of_bounds);
        }

        let line_idx = self.line - 1;
        let col_idx = self.column - 1;
        if col_idx > buffer.line_len(line_idx)? {
            return Err(out_of_bounds);
        }

        Ok(buffer.line_to_char(line_idx)? + col_idx)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ln {}, col {}", self.line, self.column)
    }
}

/// Direction of a vertical motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDirection {
    Up,
    Down,
}

/// The cursor: a flat character offset into the document.
///
/// Every operation takes the buffer it refers to and clamps against it,
/// so a cursor left over from an older, longer text never indexes out of
/// bounds.
///
/// There is no remembered "preferred column". A vertical move reclamps
/// from whatever column the cursor is on right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    offset: usize,
}

impl Cursor {
    /// Creates a cursor at the start of the document.
    pub fn new() -> Self {
        Self { offset: 0 }
    }

    /// Returns the raw flat offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Derives the line/column position from the offset.
    pub fn position(&self, buffer: &TextBuffer) -> Position {
        let offset = self.offset.min(buffer.len_chars());
        // Both lookups are in range once the offset is clamped.
        let line_idx = buffer.char_to_line(offset).unwrap_or(0);
        let line_start = buffer.line_to_char(line_idx).unwrap_or(0);

        Position {
            line: line_idx + 1,
            column: offset - line_start + 1,
        }
    }

    /// Places the cursor at an offset, clamped to the document.
    pub fn set_offset(&mut self, offset: usize, buffer: &TextBuffer) {
        self.offset = offset.min(buffer.len_chars());
    }

    /// Pulls the offset back inside the document after the text shrank.
    pub fn clamp(&mut self, buffer: &TextBuffer) {
        self.set_offset(self.offset, buffer);
    }

    /// Moves forward by `n` characters, e.g. after an insertion.
    pub fn advance(&mut self, n: usize, buffer: &TextBuffer) {
        self.set_offset(self.offset.saturating_add(n), buffer);
    }

    /// Shifts the offset by `delta` characters, staying within
    /// `[0, len_chars]`. Line breaks count as ordinary characters.
    ///
    /// Returns true if the cursor moved.
    pub fn move_by(&mut self, delta: isize, buffer: &TextBuffer) -> bool {
        let before = self.offset.min(buffer.len_chars());
        let target = if delta < 0 {
            before.saturating_sub(delta.unsigned_abs())
        } else {
            before.saturating_add(delta.unsigned_abs())
        };
        self.set_offset(target, buffer);
        self.offset != before
    }

    /// Moves one line up or down, keeping the current column when the
    /// target line is long enough and clamping to its end otherwise.
    ///
    /// Does nothing on the first line (up) or the last line (down).
    /// Returns true if the cursor moved.
    pub fn move_line(&mut self, direction: LineDirection, buffer: &TextBuffer) -> bool {
        let offset = self.offset.min(buffer.len_chars());
        let Ok(line_idx) = buffer.char_to_line(offset) else {
            return false;
        };
        let last_line = buffer.len_lines() - 1;
        let column = offset - buffer.line_to_char(line_idx).unwrap_or(0);

        let target = match direction {
            LineDirection::Up if line_idx > 0 => line_idx - 1,
            LineDirection::Down if line_idx < last_line => line_idx + 1,
            _ => return false,
        };

        let (Ok(start), Ok(len)) = (buffer.line_to_char(target), buffer.line_len(target)) else {
            return false;
        };
        self.offset = start + column.min(len);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cursor_at(offset: usize) -> Cursor {
        Cursor { offset }
    }

    #[test]
    fn test_position_of_offsets() {
        let buffer = TextBuffer::from("ab\n\ncd");
        assert_eq!(cursor_at(0).position(&buffer), Position::new(1, 1));
        assert_eq!(cursor_at(2).position(&buffer), Position::new(1, 3));
        assert_eq!(cursor_at(3).position(&buffer), Position::new(2, 1));
        assert_eq!(cursor_at(4).position(&buffer), Position::new(3, 1));
        assert_eq!(cursor_at(6).position(&buffer), Position::new(3, 3));
    }

    #[test]
    fn test_empty_document() {
        let buffer = TextBuffer::new();
        let mut cursor = Cursor::new();
        assert_eq!(cursor.position(&buffer), Position::START);
        assert!(!cursor.move_by(1, &buffer));
        assert!(!cursor.move_line(LineDirection::Down, &buffer));
        assert!(!cursor.move_line(LineDirection::Up, &buffer));
        assert_eq!(cursor.position(&buffer), Position::START);
    }

    #[test]
    fn test_move_by_clamps() {
        let buffer = TextBuffer::from("abc");
        let mut cursor = Cursor::new();
        assert!(!cursor.move_by(-1, &buffer));
        assert!(cursor.move_by(10, &buffer));
        assert_eq!(cursor.offset(), 3);
        assert!(!cursor.move_by(1, &buffer));
        assert!(cursor.move_by(-2, &buffer));
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn test_move_by_crosses_lines() {
        let buffer = TextBuffer::from("ab\ncd");
        let mut cursor = cursor_at(2);
        cursor.move_by(1, &buffer);
        assert_eq!(cursor.position(&buffer), Position::new(2, 1));
        cursor.move_by(-1, &buffer);
        assert_eq!(cursor.position(&buffer), Position::new(1, 3));
    }

    #[test]
    fn test_move_line_clamps_column() {
        let buffer = TextBuffer::from("hello\nhi\nworld");
        let mut cursor = cursor_at(4);
        assert!(cursor.move_line(LineDirection::Down, &buffer));
        assert_eq!(cursor.position(&buffer), Position::new(2, 3));

        // The clamped column is not remembered.
        assert!(cursor.move_line(LineDirection::Down, &buffer));
        assert_eq!(cursor.position(&buffer), Position::new(3, 3));
    }

    #[test]
    fn test_move_line_at_edges() {
        let buffer = TextBuffer::from("one\ntwo");
        let mut cursor = cursor_at(1);
        assert!(!cursor.move_line(LineDirection::Up, &buffer));
        assert_eq!(cursor.offset(), 1);

        let mut cursor = cursor_at(5);
        assert!(!cursor.move_line(LineDirection::Down, &buffer));
        assert_eq!(cursor.offset(), 5);
    }

    #[test]
    fn test_move_line_onto_trailing_empty_line() {
        let buffer = TextBuffer::from("abc\n");
        let mut cursor = cursor_at(2);
        assert!(cursor.move_line(LineDirection::Down, &buffer));
        assert_eq!(cursor.offset(), 4);
        assert_eq!(cursor.position(&buffer), Position::new(2, 1));
    }

    #[test]
    fn test_stale_offset_is_clamped() {
        let buffer = TextBuffer::from("ab");
        let cursor = cursor_at(40);
        assert_eq!(cursor.position(&buffer), Position::new(1, 3));
    }

    #[test]
    fn test_to_offset_rejects_out_of_bounds() {
        let buffer = TextBuffer::from("ab\nc");
        assert_eq!(Position::new(1, 3).to_offset(&buffer).unwrap(), 2);
        assert_eq!(Position::new(2, 2).to_offset(&buffer).unwrap(), 4);
        assert!(Position::new(1, 4).to_offset(&buffer).is_err());
        assert!(Position::new(3, 1).to_offset(&buffer).is_err());
        assert!(Position::new(0, 1).to_offset(&buffer).is_err());
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        proptest::collection::vec(prop_oneof!["[a-z]{0,6}", Just("\n".to_string())], 0..12)
            .prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn prop_offset_round_trip(text in text_strategy(), seed in any::<usize>()) {
            let buffer = TextBuffer::from(text.as_str());
            let offset = seed % (buffer.len_chars() + 1);
            let position = cursor_at(offset).position(&buffer);
            prop_assert_eq!(position.to_offset(&buffer).unwrap(), offset);
        }

        #[test]
        fn prop_down_then_up_returns_to_line(text in text_strategy(), seed in any::<usize>()) {
            let buffer = TextBuffer::from(text.as_str());
            let offset = seed % (buffer.len_chars() + 1);
            let mut cursor = cursor_at(offset);
            let start = cursor.position(&buffer);

            if cursor.move_line(LineDirection::Down, &buffer) {
                let below = cursor.position(&buffer);
                prop_assert_eq!(below.line, start.line + 1);
                prop_assert!(cursor.move_line(LineDirection::Up, &buffer));
                let back = cursor.position(&buffer);
                prop_assert_eq!(back.line, start.line);
                prop_assert_eq!(back.column, start.column.min(below.column));
            }
        }
    }
}
