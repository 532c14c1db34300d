//! Characters typed after `:`.

/// The command line being typed in Command mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    text: String,
}

impl CommandLine {
    /// Creates an empty command line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a character.
    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    /// Removes the last character. Returns `None` if the line was empty.
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Empties the line.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Returns the typed text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if nothing has been typed.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ":{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut line = CommandLine::new();
        line.push('w');
        line.push('q');
        assert_eq!(line.as_str(), "wq");
        assert_eq!(line.pop(), Some('q'));
        assert_eq!(line.pop(), Some('w'));
        assert_eq!(line.pop(), None);
        assert!(line.is_empty());
    }

    #[test]
    fn test_display() {
        let mut line = CommandLine::new();
        line.push('w');
        assert_eq!(line.to_string(), ":w");
    }
}
