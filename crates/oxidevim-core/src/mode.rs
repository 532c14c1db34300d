//! Editing modes and the transitions between them.
//!
//! ## Learning: State Machines as Pure Functions
//!
//! `EditorMode::transition` takes a mode and a trigger and returns the next
//! mode, or `None` when the pair is not a legal edge. It touches nothing
//! else, so the whole table can be tested without an editor.
//!
//! `ModeState` wraps the mode together with the command line, because the
//! command line's lifetime is tied to Command mode: it is emptied on every
//! edge into or out of Command.

use crate::command_line::CommandLine;

/// Editor modes (a small subset of Vim's).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorMode {
    /// Navigation; the mode every other mode returns to
    #[default]
    Normal,
    /// Typing text into the document
    Insert,
    /// Placeholder selection mode with no key handling of its own
    Visual,
    /// Typing an ex-style command
    Command,
}

impl EditorMode {
    /// Upper-case label for the status bar.
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorMode::Normal => "NORMAL",
            EditorMode::Insert => "INSERT",
            EditorMode::Visual => "VISUAL",
            EditorMode::Command => "COMMAND",
        }
    }

    /// Returns the mode reached from `self` by `trigger`, or `None` if the
    /// trigger has no edge out of this mode.
    pub fn transition(self, trigger: ModeTrigger) -> Option<EditorMode> {
        use EditorMode::*;
        use ModeTrigger as T;

        match (self, trigger) {
            (Normal, T::Insert) => Some(Insert),
            (Normal, T::Command) => Some(Command),
            (Normal, T::Visual) => Some(Visual),
            (Insert, T::Escape) => Some(Normal),
            (Command, T::Submit | T::Cancel | T::EmptyBackspace) => Some(Normal),
            (_, T::Reset) => Some(Normal),
            _ => None,
        }
    }
}

impl std::fmt::Display for EditorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that may move the machine between modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTrigger {
    /// `i` in Normal mode
    Insert,
    /// `:` in Normal mode
    Command,
    /// `v` in Normal mode
    Visual,
    /// `Escape` in Insert mode
    Escape,
    /// `Enter` in Command mode
    Submit,
    /// `Escape` in Command mode
    Cancel,
    /// `Backspace` on an empty command line
    EmptyBackspace,
    /// External reset, e.g. when another file becomes active
    Reset,
}

/// The current mode plus the command line it owns.
#[derive(Debug, Clone, Default)]
pub struct ModeState {
    mode: EditorMode,
    command_line: CommandLine,
}

impl ModeState {
    /// Starts in Normal mode with an empty command line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current mode.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Returns the command line.
    pub fn command_line(&self) -> &CommandLine {
        &self.command_line
    }

    /// Returns the command line for editing.
    ///
    /// Outside Command mode the line is always empty; callers only append
    /// while in Command mode.
    pub fn command_line_mut(&mut self) -> &mut CommandLine {
        &mut self.command_line
    }

    /// Applies a trigger. Returns the new mode when an edge was taken.
    ///
    /// A self-loop (`Reset` while already Normal) is reported as no change.
    pub fn apply(&mut self, trigger: ModeTrigger) -> Option<EditorMode> {
        let next = self.mode.transition(trigger)?;
        if next == self.mode {
            return None;
        }

        if self.mode == EditorMode::Command || next == EditorMode::Command {
            self.command_line.clear();
        }
        tracing::debug!(from = %self.mode, to = %next, ?trigger, "mode transition");
        self.mode = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use EditorMode::*;

        assert_eq!(Normal.transition(ModeTrigger::Insert), Some(Insert));
        assert_eq!(Normal.transition(ModeTrigger::Command), Some(Command));
        assert_eq!(Normal.transition(ModeTrigger::Visual), Some(Visual));
        assert_eq!(Insert.transition(ModeTrigger::Escape), Some(Normal));
        assert_eq!(Command.transition(ModeTrigger::Submit), Some(Normal));
        assert_eq!(Command.transition(ModeTrigger::Cancel), Some(Normal));
        assert_eq!(Command.transition(ModeTrigger::EmptyBackspace), Some(Normal));
        assert_eq!(Visual.transition(ModeTrigger::Reset), Some(Normal));
    }

    #[test]
    fn test_illegal_edges() {
        use EditorMode::*;

        assert_eq!(Insert.transition(ModeTrigger::Command), None);
        assert_eq!(Visual.transition(ModeTrigger::Escape), None);
        assert_eq!(Command.transition(ModeTrigger::Insert), None);
        assert_eq!(Normal.transition(ModeTrigger::Submit), None);
    }

    #[test]
    fn test_command_line_cleared_on_every_exit() {
        for exit in [
            ModeTrigger::Submit,
            ModeTrigger::Cancel,
            ModeTrigger::EmptyBackspace,
            ModeTrigger::Reset,
        ] {
            let mut state = ModeState::new();
            state.apply(ModeTrigger::Command);
            state.command_line_mut().push('w');

            assert_eq!(state.apply(exit), Some(EditorMode::Normal));
            assert!(state.command_line().is_empty(), "{exit:?} left text behind");
        }
    }

    #[test]
    fn test_reset_in_normal_is_no_change() {
        let mut state = ModeState::new();
        assert_eq!(state.apply(ModeTrigger::Reset), None);
        assert_eq!(state.mode(), EditorMode::Normal);
    }
}
