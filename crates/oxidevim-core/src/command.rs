//! Ex-style commands typed after `:`.
//!
//! ## Learning: The Command Pattern
//!
//! Dispatching a command produces a value, a `CommandOutcome`, instead of
//! reaching into the editor and changing things. The editor decides how to
//! apply it. That keeps the dispatcher pure: same text and context in,
//! same outcome out.
//!
//! Nothing here ever fails. An unknown command is an outcome like any
//! other, rendered as Vim's `E492` message.

use std::time::Duration;

use crate::config::{ProjectConfig, TimingConfig};
use crate::platform::PlatformInfo;

/// Everything a command may read about the editor.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    /// Identifier of the file being edited
    pub active_file: &'a str,
    /// Host platform facts, for simulated paths
    pub platform: &'a PlatformInfo,
}

/// One status message of a staged outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Delay from the moment the command was submitted
    pub at: Duration,
    /// Message shown once the delay elapses
    pub message: String,
}

/// A result delivered as several time-separated status messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StagedOutcome {
    stages: Vec<Stage>,
}

impl StagedOutcome {
    /// Starts an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message shown `after` the previous stage.
    pub fn then(mut self, after: Duration, message: impl Into<String>) -> Self {
        let at = self.stages.last().map_or(Duration::ZERO, |s| s.at) + after;
        self.stages.push(Stage {
            at,
            message: message.into(),
        });
        self
    }

    /// Returns the stages in order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Returns the total time until the last stage is shown.
    pub fn duration(&self) -> Duration {
        self.stages.last().map_or(Duration::ZERO, |s| s.at)
    }
}

/// What submitting a command line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// `:w`: the buffer is already live in memory, so only a message is shown
    Written { file: String },
    /// The command is not allowed, e.g. `:q` on the only buffer
    Refused { message: String },
    /// `:graph`: flip the graph overlay
    ToggleGraph,
    /// Simulated cargo invocations
    Staged(StagedOutcome),
    /// Anything else; carries the trimmed text as typed
    Unknown { command: String },
}

impl CommandOutcome {
    /// The message to show immediately, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            CommandOutcome::Written { file } => Some(format!("\"{file}\" written")),
            CommandOutcome::Refused { message } => Some(message.clone()),
            CommandOutcome::ToggleGraph => None,
            CommandOutcome::Staged(_) => None,
            CommandOutcome::Unknown { command } => {
                Some(format!("E492: Not an editor command: {command}"))
            }
        }
    }

    /// Whether the generic timer should clear the status line afterwards.
    ///
    /// Staged outcomes manage their own messages.
    pub fn auto_clears(&self) -> bool {
        !matches!(self, CommandOutcome::Staged(_))
    }

    /// Returns true for the unknown-command outcome.
    pub fn is_error(&self) -> bool {
        matches!(self, CommandOutcome::Unknown { .. })
    }
}

/// Message shown by `:q`.
pub const QUIT_REFUSED: &str = "Cannot quit main buffer";

/// Final message of `:cargo build` and `:cargo check` (before the timing).
const FINISHED_DEV: &str = "Finished dev [unoptimized + debuginfo] target(s) in";

/// Resolves command text into outcomes.
#[derive(Debug, Clone, Default)]
pub struct CommandDispatcher {
    timing: TimingConfig,
    project: ProjectConfig,
}

impl CommandDispatcher {
    /// Creates a dispatcher with the given delays and simulated project.
    pub fn new(timing: TimingConfig, project: ProjectConfig) -> Self {
        Self { timing, project }
    }

    /// Maps command text to an outcome.
    ///
    /// Surrounding whitespace is ignored. `w`, `q` and `graph` must match
    /// exactly; the `cargo` commands match by prefix, so `cargo run --release`
    /// is still `cargo run`. Matching is case-sensitive.
    pub fn dispatch(&self, text: &str, ctx: CommandContext<'_>) -> CommandOutcome {
        let command = text.trim();
        tracing::debug!(%command, "dispatching command");

        match command {
            "w" => CommandOutcome::Written {
                file: ctx.active_file.to_string(),
            },
            "q" => CommandOutcome::Refused {
                message: QUIT_REFUSED.to_string(),
            },
            "graph" => CommandOutcome::ToggleGraph,
            _ if command.starts_with("cargo run") => CommandOutcome::Staged(self.cargo_run(ctx)),
            _ if command.starts_with("cargo build") => CommandOutcome::Staged(self.cargo_build()),
            _ if command.starts_with("cargo check") => CommandOutcome::Staged(self.cargo_check()),
            _ => CommandOutcome::Unknown {
                command: command.to_string(),
            },
        }
    }

    fn cargo_run(&self, ctx: CommandContext<'_>) -> StagedOutcome {
        let platform = ctx.platform;
        let target_dir = platform.join_path(&["target", "debug"]);
        let binary = platform.format_binary_path(&target_dir, &self.project.crate_name);

        StagedOutcome::new()
            .then(Duration::ZERO, format!("Compiling {}...", ctx.active_file))
            .then(
                Duration::from_millis(self.timing.run_compile_ms),
                format!("Running {binary}..."),
            )
            .then(
                Duration::from_millis(self.timing.run_launch_ms),
                format!("Output: \"{}\"", self.project.greeting),
            )
    }

    fn cargo_build(&self) -> StagedOutcome {
        StagedOutcome::new()
            .then(Duration::ZERO, "Compiling dependencies...")
            .then(
                Duration::from_millis(self.timing.build_ms),
                format!("{FINISHED_DEV} 1.2s"),
            )
    }

    fn cargo_check(&self) -> StagedOutcome {
        StagedOutcome::new()
            .then(
                Duration::ZERO,
                format!(
                    "Checking {} v{}...",
                    self.project.crate_name, self.project.version
                ),
            )
            .then(
                Duration::from_millis(self.timing.check_ms),
                format!("{FINISHED_DEV} 0.5s"),
            )
    }
}
