//! The status bar at the bottom of the editor.

use crate::editor::Editor;

/// A change to the status message slot, applied when its timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Replace the message
    Show(String),
    /// Remove the message
    Clear,
}

/// Renders the editor's state as a single line of text.
///
/// ## Layout
///
/// ```text
/// NORMAL | main | main.rs | ["main.rs" written] || linux | utf-8 | LF | ln 1, col 1 | Top
/// ```
///
/// The left half describes the buffer, the right half the platform and
/// cursor. The message segment is only present while a message is set.
pub struct StatusBar;

impl StatusBar {
    /// Name of the branch segment. There is no version control behind it.
    pub const BRANCH: &'static str = "main";

    /// Renders the status line.
    pub fn render(editor: &Editor) -> String {
        let platform = editor.platform();

        let mut left = vec![
            editor.mode().as_str().to_string(),
            Self::BRANCH.to_string(),
            editor.active_file().to_string(),
        ];
        if let Some(message) = editor.status() {
            left.push(format!("[{message}]"));
        }

        let right = [
            platform.os.to_string(),
            "utf-8".to_string(),
            platform.line_ending.label().to_string(),
            editor.position().to_string(),
            "Top".to_string(),
        ];

        format!("{} || {}", left.join(" | "), right.join(" | "))
    }

    /// Renders the command line, or `None` outside Command mode.
    pub fn command_line(editor: &Editor) -> Option<String> {
        (editor.mode() == crate::EditorMode::Command).then(|| editor.command_line().to_string())
    }
}
