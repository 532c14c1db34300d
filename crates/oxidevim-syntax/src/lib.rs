//! # OxideVim Syntax
//!
//! Display-only Rust highlighting.
//!
//! ## Why not a real parser?
//!
//! The highlighter only colours what is on screen. It splits each line on
//! a fixed set of delimiters and classifies the pieces by word lists, so it
//! is wrong in the same predictable ways on every line:
//! - Block comments and multi-line strings are not tracked across lines
//! - A `"` inside a char literal still toggles string state
//! - Any capitalised word counts as a type
//!
//! ## Learning: Pure Functions
//!
//! `highlight_line` owns no state between calls. String state lives in a
//! local variable for the duration of one line, so the same line always
//! produces the same tokens and lines can be highlighted in any order.

use std::ops::Range;

/// A styled span of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Byte range within the line
    pub span: Range<usize>,
    /// How to colour it
    pub style: StyleTag,
}

/// Kinds of syntax elements for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTag {
    Comment,
    Keyword,
    Type,
    Function,
    Number,
    String,
    Char,
    Punctuation,
    Whitespace,
    Plain,
}

impl StyleTag {
    /// Returns the theme color key for this style.
    pub fn theme_key(&self) -> &'static str {
        match self {
            StyleTag::Comment => "comment",
            StyleTag::Keyword => "keyword",
            StyleTag::Type => "type_name",
            StyleTag::Function => "function",
            StyleTag::Number => "number",
            StyleTag::String | StyleTag::Char => "string",
            StyleTag::Punctuation | StyleTag::Whitespace | StyleTag::Plain => "text",
        }
    }

    /// Default colour as `#rrggbb`.
    pub fn color(&self) -> &'static str {
        match self {
            StyleTag::Comment => "#6b7280",
            StyleTag::Keyword => "#ef4723",
            StyleTag::Type => "#e5c07b",
            StyleTag::Function => "#61afef",
            StyleTag::Number => "#d19a66",
            StyleTag::String | StyleTag::Char => "#98c379",
            StyleTag::Punctuation | StyleTag::Whitespace | StyleTag::Plain => "#e6e6e6",
        }
    }
}

const KEYWORDS: &[&str] = &[
    "fn", "let", "mut", "pub", "struct", "enum", "impl", "use", "mod", "match", "if", "else",
    "return", "true", "false", "async", "await",
];

const TYPES: &[&str] = &["String", "u32", "i32", "Vec", "Option", "Result", "Self"];

const FUNCTIONS: &[&str] = &["println", "vec"];

/// Characters that end a word and form a token of their own.
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || "(){}[]<>,.;:!=+-\"".contains(c)
}

/// Highlights every line of a text. Lines are split on `\n` only.
pub fn highlight(text: &str) -> Vec<Vec<Token>> {
    text.split('\n').map(highlight_line).collect()
}

/// Highlights a single line.
pub fn highlight_line(line: &str) -> Vec<Token> {
    if line.trim_start().starts_with("//") {
        return vec![Token {
            span: 0..line.len(),
            style: StyleTag::Comment,
        }];
    }

    let mut tokens = Vec::new();
    let mut in_string = false;
    for span in split_keeping_delimiters(line) {
        let piece = &line[span.clone()];
        let style = if piece == "\"" {
            in_string = !in_string;
            StyleTag::String
        } else if in_string {
            StyleTag::String
        } else {
            classify(piece)
        };
        tokens.push(Token { span, style });
    }
    tokens
}

/// Splits a line into words and single-character delimiters.
fn split_keeping_delimiters(line: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut word_start = 0;
    for (i, c) in line.char_indices() {
        if is_delimiter(c) {
            if word_start < i {
                spans.push(word_start..i);
            }
            let end = i + c.len_utf8();
            spans.push(i..end);
            word_start = end;
        }
    }
    if word_start < line.len() {
        spans.push(word_start..line.len());
    }
    spans
}

/// Styles a piece outside a string literal.
fn classify(piece: &str) -> StyleTag {
    let mut chars = piece.chars();
    let first = chars.next();
    let single_delimiter = first.is_some_and(is_delimiter) && chars.next().is_none();

    if single_delimiter {
        if piece.chars().all(char::is_whitespace) {
            StyleTag::Whitespace
        } else {
            StyleTag::Punctuation
        }
    } else if KEYWORDS.contains(&piece) {
        StyleTag::Keyword
    } else if TYPES.contains(&piece) || first.is_some_and(|c| c.is_ascii_uppercase()) {
        StyleTag::Type
    } else if FUNCTIONS.contains(&piece) {
        StyleTag::Function
    } else if piece.chars().all(|c| c.is_ascii_digit()) {
        StyleTag::Number
    } else if piece.starts_with('\'') {
        StyleTag::Char
    } else {
        StyleTag::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(line: &str) -> Vec<(&str, StyleTag)> {
        highlight_line(line)
            .into_iter()
            .map(|t| (&line[t.span], t.style))
            .collect()
    }

    #[test]
    fn test_rust_highlighting() {
        use StyleTag::*;

        assert_eq!(
            styled("pub fn new() -> Self {"),
            vec![
                ("pub", Keyword),
                (" ", Whitespace),
                ("fn", Keyword),
                (" ", Whitespace),
                ("new", Plain),
                ("(", Punctuation),
                (")", Punctuation),
                (" ", Whitespace),
                ("-", Punctuation),
                (">", Punctuation),
                (" ", Whitespace),
                ("Self", Type),
                (" ", Whitespace),
                ("{", Punctuation),
            ]
        );
    }

    #[test]
    fn test_comment_line() {
        let line = "    // Handle insert mode";
        assert_eq!(
            highlight_line(line),
            vec![Token {
                span: 0..line.len(),
                style: StyleTag::Comment
            }]
        );
    }

    #[test]
    fn test_string_state() {
        use StyleTag::*;

        assert_eq!(
            styled(r#"println!("Hi, 42");"#),
            vec![
                ("println", Function),
                ("!", Punctuation),
                ("(", Punctuation),
                ("\"", String),
                ("Hi", String),
                (",", String),
                (" ", String),
                ("42", String),
                ("\"", String),
                (")", Punctuation),
                (";", Punctuation),
            ]
        );
    }

    #[test]
    fn test_numbers_chars_and_types() {
        use StyleTag::*;

        assert_eq!(
            styled("let x: u32 = 7 + 'a' as Node"),
            vec![
                ("let", Keyword),
                (" ", Whitespace),
                ("x", Plain),
                (":", Punctuation),
                (" ", Whitespace),
                ("u32", Type),
                (" ", Whitespace),
                ("=", Punctuation),
                (" ", Whitespace),
                ("7", Number),
                (" ", Whitespace),
                ("+", Punctuation),
                (" ", Whitespace),
                ("'a'", Char),
                (" ", Whitespace),
                ("as", Plain),
                (" ", Whitespace),
                ("Node", Type),
            ]
        );
    }

    #[test]
    fn test_spans_cover_line() {
        let text = "fn main() {\n    let µ = vec![1];\n}";
        for (line, tokens) in text.split('\n').zip(highlight(text)) {
            let rebuilt: String = tokens.iter().map(|t| &line[t.span.clone()]).collect();
            assert_eq!(rebuilt, line);
        }
        assert_eq!(highlight("").len(), 1);
        assert!(highlight_line("").is_empty());
    }
}
