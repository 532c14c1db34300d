//! Key dispatch: one keystroke in, one state change out.
//!
//! `Tab` is looked at before anything else, in every mode. After that the
//! current mode decides who sees the key:
//!
//! - Normal: the keymap, which yields motions and mode changes
//! - Insert: the document
//! - Command: the command line
//! - Visual: nobody
//!
//! Keys nobody handles are dropped without a message.

use oxidevim_buffer::{LineDirection, Position};

use super::Editor;
use crate::command::CommandOutcome;
use crate::event::EditorEvent;
use crate::keymap::{Action, Key, KeyPress};
use crate::mode::{EditorMode, ModeTrigger};

/// What a keystroke did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// The key was absorbed without effect
    NoOp,
    /// The editor entered a new mode
    ModeChanged(EditorMode),
    /// The cursor moved
    CursorMoved(Position),
    /// The document text changed
    TextMutated,
    /// A character was added to or removed from the command line
    CommandBufferChanged,
    /// The command line was submitted
    CommandSubmitted(CommandOutcome),
    /// The graph overlay was shown or hidden
    GraphToggled(bool),
}

impl Editor {
    /// Handles one keystroke in the current mode.
    pub fn handle_key(&mut self, key: KeyPress) -> DispatchResult {
        let mode = self.mode();
        tracing::trace!(%key, %mode, "key");

        if key.key == Key::Tab {
            return self.handle_tab(mode);
        }

        match mode {
            EditorMode::Normal => self.handle_normal(key),
            EditorMode::Insert => self.handle_insert(key),
            EditorMode::Command => self.handle_command(key),
            EditorMode::Visual => DispatchResult::NoOp,
        }
    }

    fn handle_tab(&mut self, mode: EditorMode) -> DispatchResult {
        match mode {
            EditorMode::Normal => DispatchResult::GraphToggled(self.toggle_graph()),
            EditorMode::Insert => {
                let indent = self.config.editor.indent_unit.clone();
                self.insert_text(&indent)
            }
            EditorMode::Visual | EditorMode::Command => DispatchResult::NoOp,
        }
    }

    fn handle_normal(&mut self, key: KeyPress) -> DispatchResult {
        let Some(action) = self.keymap.lookup(key, EditorMode::Normal) else {
            return DispatchResult::NoOp;
        };
        tracing::debug!(?action, "normal mode action");

        match action {
            Action::MoveLeft => self.move_cursor(-1),
            Action::MoveRight => self.move_cursor(1),
            Action::MoveUp => self.move_line(LineDirection::Up),
            Action::MoveDown => self.move_line(LineDirection::Down),
            Action::EnterInsertMode => self.transition(ModeTrigger::Insert),
            Action::EnterCommandMode => self.transition(ModeTrigger::Command),
            Action::EnterVisualMode => self.transition(ModeTrigger::Visual),
            Action::ToggleGraph => DispatchResult::GraphToggled(self.toggle_graph()),
        }
    }

    fn handle_insert(&mut self, key: KeyPress) -> DispatchResult {
        if key.key == Key::Escape {
            return self.transition(ModeTrigger::Escape);
        }
        if key.modifiers.is_chord() {
            return DispatchResult::NoOp;
        }

        match key.key {
            Key::Char(c) if !c.is_control() => {
                let mut utf8 = [0; 4];
                self.insert_text(c.encode_utf8(&mut utf8))
            }
            Key::Enter => self.insert_text("\n"),
            Key::Backspace => self.delete_backward(),
            Key::Delete => self.delete_forward(),
            Key::Left => self.move_cursor(-1),
            Key::Right => self.move_cursor(1),
            Key::Up => self.move_line(LineDirection::Up),
            Key::Down => self.move_line(LineDirection::Down),
            _ => DispatchResult::NoOp,
        }
    }

    fn handle_command(&mut self, key: KeyPress) -> DispatchResult {
        match key.key {
            Key::Enter => self.submit_command(),
            Key::Escape => self.transition(ModeTrigger::Cancel),
            Key::Backspace if self.command_line().is_empty() => {
                self.transition(ModeTrigger::EmptyBackspace)
            }
            Key::Backspace => {
                self.modes.command_line_mut().pop();
                DispatchResult::CommandBufferChanged
            }
            Key::Char(c) if !c.is_control() && !key.modifiers.is_chord() => {
                self.modes.command_line_mut().push(c);
                DispatchResult::CommandBufferChanged
            }
            _ => DispatchResult::NoOp,
        }
    }

    /// Leaves Command mode and runs what was typed.
    fn submit_command(&mut self) -> DispatchResult {
        let text = self.command_line().as_str().to_string();
        self.apply_trigger(ModeTrigger::Submit);

        let outcome = self.dispatch_command(&text);
        self.apply_outcome(&outcome);
        DispatchResult::CommandSubmitted(outcome)
    }

    fn transition(&mut self, trigger: ModeTrigger) -> DispatchResult {
        match self.apply_trigger(trigger) {
            Some(mode) => DispatchResult::ModeChanged(mode),
            None => DispatchResult::NoOp,
        }
    }

    // ==================== Cursor ====================

    fn move_cursor(&mut self, delta: isize) -> DispatchResult {
        let moved = self.cursor.move_by(delta, &self.buffer);
        self.cursor_result(moved)
    }

    fn move_line(&mut self, direction: LineDirection) -> DispatchResult {
        let moved = self.cursor.move_line(direction, &self.buffer);
        self.cursor_result(moved)
    }

    fn cursor_result(&self, moved: bool) -> DispatchResult {
        if !moved {
            return DispatchResult::NoOp;
        }
        let position = self.position();
        self.emit(EditorEvent::CursorMoved(position));
        DispatchResult::CursorMoved(position)
    }

    // ==================== Text ====================

    /// Inserts text at the cursor and moves the cursor past it.
    fn insert_text(&mut self, text: &str) -> DispatchResult {
        self.cursor.clamp(&self.buffer);
        if let Err(err) = self.buffer.insert(self.cursor.offset(), text) {
            tracing::warn!("insert failed: {}", err);
            return DispatchResult::NoOp;
        }
        self.cursor.advance(text.chars().count(), &self.buffer);
        self.text_changed()
    }

    /// Deletes the character before the cursor.
    fn delete_backward(&mut self) -> DispatchResult {
        self.cursor.clamp(&self.buffer);
        let end = self.cursor.offset();
        if end == 0 {
            return DispatchResult::NoOp;
        }
        if let Err(err) = self.buffer.delete(end - 1..end) {
            tracing::warn!("delete failed: {}", err);
            return DispatchResult::NoOp;
        }
        self.cursor.set_offset(end - 1, &self.buffer);
        self.text_changed()
    }

    /// Deletes the character after the cursor.
    fn delete_forward(&mut self) -> DispatchResult {
        self.cursor.clamp(&self.buffer);
        let start = self.cursor.offset();
        if start >= self.buffer.len_chars() {
            return DispatchResult::NoOp;
        }
        if let Err(err) = self.buffer.delete(start..start + 1) {
            tracing::warn!("delete failed: {}", err);
            return DispatchResult::NoOp;
        }
        self.text_changed()
    }

    /// Reports an edit. The text reaches `files` on the next write-back.
    fn text_changed(&mut self) -> DispatchResult {
        self.emit(EditorEvent::DocumentChanged(self.active.clone()));
        DispatchResult::TextMutated
    }
}
