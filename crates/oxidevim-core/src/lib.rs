//! # OxideVim Core
//!
//! The modal editing engine and the state around it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Editor                           │
//! │  ┌────────────┐ ┌─────────────┐ ┌──────────────────────┐ │
//! │  │ ModeState  │ │   Keymap    │ │  CommandDispatcher   │ │
//! │  │ + cmd line │ │             │ │  -> CommandOutcome   │ │
//! │  └────────────┘ └─────────────┘ └──────────────────────┘ │
//! │  ┌────────────┐ ┌─────────────┐ ┌──────────────────────┐ │
//! │  │ TextBuffer │ │  Scheduler  │ │   FileCollection     │ │
//! │  │ + Cursor   │ │ (status)    │ │   (project graph)    │ │
//! │  └────────────┘ └─────────────┘ └──────────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//!        ▲ KeyPress                         │ EditorEvent
//!        │                                  ▼
//!    front end  ◄──────────────────────  EventBus
//! ```
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

pub mod command;
pub mod command_line;
pub mod config;
pub mod editor;
pub mod event;
pub mod files;
pub mod keymap;
pub mod mode;
pub mod platform;
pub mod scheduler;
pub mod status;

pub use command::{CommandContext, CommandDispatcher, CommandOutcome, StagedOutcome};
pub use command_line::CommandLine;
pub use config::Config;
pub use editor::{DispatchResult, Editor};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use files::{FileCollection, FileNode, GraphData, GraphLink};
pub use keymap::{Action, Key, KeyBinding, KeyPress, Keymap, Modifiers};
pub use mode::{EditorMode, ModeState, ModeTrigger};
pub use platform::{LineEnding, Os, PlatformInfo};
pub use scheduler::Scheduler;
pub use status::{StatusBar, StatusUpdate};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Buffer error: {0}")]
    Buffer(#[from] oxidevim_buffer::BufferError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Project error: {0}")]
    Graph(#[from] files::GraphError),
}
