//! Main editor orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Editor` acts as a facade, providing a simple interface to
//! complex subsystems. External code only needs to interact with
//! `Editor`, not individual components.
//!
//! ## Learning: One Owner for All State
//!
//! Mode, cursor, document and status message live in one struct and are
//! only changed through `&mut self`. Keystrokes go in through
//! [`Editor::handle_key`], time goes in through [`Editor::advance`]; there
//! is no other way for state to change, which makes every scenario
//! replayable in a test.

mod dispatch;

use std::borrow::Cow;
use std::time::Duration;

use oxidevim_buffer::{Cursor, Position, TextBuffer};

use crate::command::{CommandContext, CommandDispatcher, CommandOutcome};
use crate::command_line::CommandLine;
use crate::config::Config;
use crate::event::{EditorEvent, EventBus};
use crate::files::{FileCollection, GraphData};
use crate::keymap::Keymap;
use crate::mode::{EditorMode, ModeState, ModeTrigger};
use crate::platform::PlatformInfo;
use crate::scheduler::Scheduler;
use crate::status::StatusUpdate;
use crate::{CoreError, CoreResult};

pub use dispatch::DispatchResult;

/// The main editor state.
///
/// ## Thread Safety
///
/// `Editor` is designed to be owned by a single thread. Delayed status
/// updates are queued on a virtual clock instead of spawned, so nothing
/// else ever touches this state.
pub struct Editor {
    /// The project's files
    files: FileCollection,

    /// Id of the file loaded into `buffer`
    active: String,

    /// The document being edited. Its modified flag means edits not yet
    /// written to `files`.
    buffer: TextBuffer,

    /// Cursor into `buffer`
    cursor: Cursor,

    /// Current mode and the command line
    modes: ModeState,

    /// Whether the graph overlay is shown
    graph_visible: bool,

    /// Status message slot
    status: Option<String>,

    /// Pending status updates
    timers: Scheduler<StatusUpdate>,

    /// Editor configuration
    config: Config,

    /// Key bindings
    keymap: Keymap,

    /// Command resolution
    dispatcher: CommandDispatcher,

    /// Host platform facts
    platform: PlatformInfo,

    /// Event bus for notifications
    event_bus: EventBus,
}

impl Editor {
    /// Creates an editor over a project.
    ///
    /// Opens `editor.start_file` from the config, or the project's first
    /// file when that is unset.
    pub fn new(config: Config, project: GraphData, platform: PlatformInfo) -> CoreResult<Self> {
        let files = FileCollection::new(project)?;
        let active = match &config.editor.start_file {
            Some(id) => id.clone(),
            None => files.first_id().to_string(),
        };
        let content = files
            .content(&active)
            .ok_or_else(|| CoreError::FileNotFound(active.clone()))?;
        let buffer = TextBuffer::from(content);

        tracing::info!(file = %active, "editor started");

        Ok(Self {
            files,
            active,
            buffer,
            cursor: Cursor::new(),
            modes: ModeState::new(),
            graph_visible: false,
            status: None,
            timers: Scheduler::new(),
            keymap: Keymap::from_config(&config),
            dispatcher: CommandDispatcher::new(config.timing.clone(), config.project.clone()),
            config,
            platform,
            event_bus: EventBus::new(),
        })
    }

    /// Creates an editor over the built-in demo project.
    pub fn with_sample_project(config: Config) -> CoreResult<Self> {
        Self::new(config, GraphData::sample(), PlatformInfo::detect())
    }

    // ==================== State ====================

    /// Returns the current editor mode.
    pub fn mode(&self) -> EditorMode {
        self.modes.mode()
    }

    /// Returns the cursor position.
    pub fn position(&self) -> Position {
        self.cursor.position(&self.buffer)
    }

    /// Returns the cursor's flat offset.
    pub fn cursor_offset(&self) -> usize {
        self.cursor.offset()
    }

    /// Returns the document text.
    pub fn text(&self) -> Cow<'_, str> {
        self.buffer.text()
    }

    /// Returns the document.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns the id of the file being edited.
    pub fn active_file(&self) -> &str {
        &self.active
    }

    /// Returns the status message, if one is shown.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns true if the graph overlay is shown.
    pub fn graph_visible(&self) -> bool {
        self.graph_visible
    }

    /// Returns the command line.
    pub fn command_line(&self) -> &CommandLine {
        self.modes.command_line()
    }

    /// Returns the project's files, with the active document's edits
    /// written back first.
    pub fn files(&mut self) -> &FileCollection {
        self.persist();
        &self.files
    }

    /// Ids linked to the active file in the graph.
    pub fn neighbours(&self) -> Vec<&str> {
        self.files.neighbours(&self.active)
    }

    /// Returns the platform facts.
    pub fn platform(&self) -> &PlatformInfo {
        &self.platform
    }

    /// Returns the editor configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the keymap.
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    // ==================== Files ====================

    /// Makes another file the active one, as when its graph node is clicked.
    ///
    /// The current document is written back first. The new file starts in
    /// Normal mode with the cursor at the beginning, and the graph overlay
    /// is closed.
    pub fn open_file(&mut self, id: &str) -> CoreResult<()> {
        if !self.files.contains(id) {
            return Err(CoreError::FileNotFound(id.to_string()));
        }
        self.persist();
        let content = self.files.content(id).unwrap_or_default().to_string();

        self.active = id.to_string();
        self.buffer.set_text(&content);
        self.cursor = Cursor::new();
        tracing::info!(file = %id, "opened file");
        self.emit(EditorEvent::FileOpened(self.active.clone()));

        self.reset_mode();
        self.set_graph_visible(false);

        self.set_status(Some(format!("Opened {id}")));
        self.schedule_clear(self.config.timing.open_clear_ms);
        Ok(())
    }

    /// Writes the document back to its file if it changed since the
    /// last write.
    fn persist(&mut self) {
        if !self.buffer.is_modified() {
            return;
        }
        let text = self.buffer.text().into_owned();
        self.files.set_content(&self.active, text);
        self.buffer.mark_saved();
    }

    // ==================== Mode ====================

    /// Returns to Normal mode from wherever the editor is.
    ///
    /// This is the only way out of Visual mode.
    pub fn reset_mode(&mut self) {
        self.apply_trigger(ModeTrigger::Reset);
    }

    /// Applies a mode trigger, emitting an event if the mode changed.
    fn apply_trigger(&mut self, trigger: ModeTrigger) -> Option<EditorMode> {
        let mode = self.modes.apply(trigger)?;
        self.emit(EditorEvent::ModeChanged(mode));
        Some(mode)
    }

    // ==================== Graph ====================

    /// Flips the graph overlay and returns the new visibility.
    pub fn toggle_graph(&mut self) -> bool {
        self.set_graph_visible(!self.graph_visible);
        self.graph_visible
    }

    fn set_graph_visible(&mut self, visible: bool) {
        if self.graph_visible != visible {
            self.graph_visible = visible;
            self.emit(EditorEvent::GraphToggled(visible));
        }
    }

    // ==================== Commands ====================

    /// Applies a command outcome: shows its message, runs its side effect
    /// and queues the status updates it needs.
    fn apply_outcome(&mut self, outcome: &CommandOutcome) {
        match outcome {
            CommandOutcome::ToggleGraph => {
                self.toggle_graph();
            }
            CommandOutcome::Staged(staged) => {
                for stage in staged.stages() {
                    if stage.at.is_zero() {
                        self.set_status(Some(stage.message.clone()));
                    } else {
                        self.timers
                            .schedule(stage.at, StatusUpdate::Show(stage.message.clone()));
                    }
                }
            }
            CommandOutcome::Written { .. }
            | CommandOutcome::Refused { .. }
            | CommandOutcome::Unknown { .. } => {}
        }

        if let Some(message) = outcome.message() {
            self.set_status(Some(message));
        }
        if outcome.auto_clears() {
            self.schedule_clear(self.config.timing.status_clear_ms);
        }
    }

    /// Resolves the command line into an outcome.
    fn dispatch_command(&self, text: &str) -> CommandOutcome {
        let ctx = CommandContext {
            active_file: &self.active,
            platform: &self.platform,
        };
        self.dispatcher.dispatch(text, ctx)
    }

    // ==================== Time ====================

    /// Moves the editor's clock forward, applying every status update that
    /// became due.
    pub fn advance(&mut self, by: Duration) {
        for update in self.timers.advance(by) {
            match update {
                StatusUpdate::Show(message) => self.set_status(Some(message)),
                StatusUpdate::Clear => self.set_status(None),
            }
        }
    }

    /// Returns how long until the next status update, if any is pending.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    /// Returns true if no status updates are pending.
    pub fn is_idle(&self) -> bool {
        self.timers.is_idle()
    }

    /// Returns the editor's virtual time.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    fn schedule_clear(&mut self, after_ms: u64) {
        self.timers
            .schedule(Duration::from_millis(after_ms), StatusUpdate::Clear);
    }

    fn set_status(&mut self, message: Option<String>) {
        if self.status != message {
            self.status = message;
            self.emit(EditorEvent::StatusChanged(self.status.clone()));
        }
    }

    // ==================== Events ====================

    /// Subscribes to editor events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EditorEvent> {
        self.event_bus.subscribe()
    }

    fn emit(&self, event: EditorEvent) {
        self.event_bus.emit(event);
    }
}
