//! # OxideVim Buffer
//!
//! The document text and the cursor that walks over it.
//!
//! ## Learning: Who Owns What
//!
//! `TextBuffer` owns the characters. `Cursor` owns a single offset and
//! borrows the buffer for every motion, so a cursor can never point into
//! text it has not been checked against. Anything that would step
//! outside the text is clamped, or rejected with a `BufferError`.

mod buffer;
mod cursor;

pub use buffer::TextBuffer;
pub use cursor::{Cursor, LineDirection, Position};

pub type BufferResult<T> = Result<T, BufferError>;

/// Why a buffer or cursor request was refused.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    /// A 1-based position that does not exist in the text
    #[error("no {line}:{column} in this document")]
    PositionOutOfBounds { line: usize, column: usize },

    /// A 0-based line index past the end
    #[error("line index {line} past the end ({lines} lines)")]
    LineOutOfBounds { line: usize, lines: usize },

    #[error("char offset {0} past the end of the text")]
    InvalidCharIndex(usize),

    #[error("range {start}..{end} runs backwards")]
    InvalidRange { start: usize, end: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_has_one_line() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len_lines(), 1);
        assert_eq!(Cursor::new().position(&buffer), Position::START);
    }

    #[test]
    fn test_typing_a_line_comment() {
        let mut buffer = TextBuffer::from("fn main() {}");
        let mut cursor = Cursor::new();

        for ch in ["/", "/", " "] {
            buffer.insert(cursor.offset(), ch).unwrap();
            cursor.advance(1, &buffer);
        }

        assert_eq!(buffer.text(), "// fn main() {}");
        assert_eq!(cursor.position(&buffer), Position::new(1, 4));
    }

    #[test]
    fn test_cursor_follows_insertion() {
        let mut buffer = TextBuffer::from("fn main() {}");
        let mut cursor = Cursor::new();
        cursor.set_offset(3, &buffer);

        buffer.insert(cursor.offset(), "my_").unwrap();
        cursor.advance(3, &buffer);

        assert_eq!(buffer.text(), "fn my_main() {}");
        assert_eq!(cursor.position(&buffer), Position::new(1, 7));
    }

    #[test]
    fn test_error_messages() {
        let err = BufferError::PositionOutOfBounds { line: 9, column: 1 };
        assert_eq!(err.to_string(), "no 9:1 in this document");
        assert_eq!(
            BufferError::InvalidRange { start: 3, end: 1 }.to_string(),
            "range 3..1 runs backwards"
        );
    }
}
