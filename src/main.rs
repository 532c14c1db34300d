//! # OxideVim - A Modal Editing Engine
//!
//! Drives the editor from the terminal: key sequences come in as Vim
//! notation, the status bar goes out after each one.
//!
//! ## Quick Start
//!
//! ```bash
//! # Replay keys against the built-in sample project
//! cargo run -- --keys "i// hi<CR><Esc>:w<CR>" --print
//!
//! # Type sequences line by line; "@lib.rs" opens a file
//! cargo run
//!
//! # Use your own project
//! cargo run -- --project project.json --file main.rs
//! ```

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oxidevim_core::{Config, Editor, EventHandler, GraphData, KeyPress, PlatformInfo, StatusBar};
use oxidevim_syntax::highlight;

/// OxideVim - a Vim-style modal editing engine
#[derive(Parser, Debug)]
#[command(name = "oxidevim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Keys to replay, in Vim notation (e.g. "ihello<Esc>:cargo run<CR>")
    #[arg(short, long, value_name = "SEQ")]
    keys: Option<String>,

    /// Project file with nodes and links (JSON); the sample project if unset
    #[arg(short, long, value_name = "JSON")]
    project: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// File to open first
    #[arg(short, long, value_name = "ID")]
    file: Option<String>,

    /// Exit without waiting for pending status messages
    #[arg(long)]
    no_wait: bool,

    /// Print the active document before exiting
    #[arg(long)]
    print: bool,

    /// Syntax-colour the printed document
    #[arg(long, requires = "print")]
    color: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting OxideVim v{}", env!("CARGO_PKG_VERSION"));

    let mut editor = build_editor(&args)?;

    let mut handler = EventHandler::new(editor.subscribe());
    let logger = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            tracing::debug!(?event, "editor event");
        }
    });

    let mut clock = WallClock::new();
    let mut out = std::io::stdout();

    match &args.keys {
        Some(keys) => {
            run_line(&mut editor, keys).context("invalid --keys sequence")?;
            print_status(&editor, &mut out)?;
        }
        None => drive_stdin(&mut editor, &mut clock, &mut out).await?,
    }

    if !args.no_wait {
        wait_until_idle(&mut editor, &mut clock, &mut out).await?;
    }

    if args.print {
        print_document(&editor, args.color, &mut out)?;
    }

    drop(editor);
    logger.await.context("event logger failed")?;
    Ok(())
}

/// Builds the editor from config, project and command line overrides.
fn build_editor(args: &Args) -> anyhow::Result<Editor> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load(),
    };
    if let Some(file) = &args.file {
        config.editor.start_file = Some(file.clone());
    }

    let project = load_project(args.project.as_deref())?;
    Editor::new(config, project, PlatformInfo::detect()).context("failed to start editor")
}

fn load_project(path: Option<&Path>) -> anyhow::Result<GraphData> {
    match path {
        Some(path) => GraphData::load(path)
            .with_context(|| format!("failed to load project from {}", path.display())),
        None => Ok(GraphData::sample()),
    }
}

/// Runs one input line: `@<id>` opens a file, anything else is a key
/// sequence.
fn run_line(editor: &mut Editor, line: &str) -> anyhow::Result<()> {
    if let Some(id) = line.trim().strip_prefix('@') {
        editor.open_file(id)?;
        return Ok(());
    }

    for key in KeyPress::parse_sequence(line)? {
        let result = editor.handle_key(key);
        tracing::trace!(%key, ?result, "handled key");
    }
    Ok(())
}

/// Reads input lines until EOF, applying status timers while waiting.
async fn drive_stdin(
    editor: &mut Editor,
    clock: &mut WallClock,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let wait = editor.time_until_next();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                clock.sync(editor);
                if let Err(err) = run_line(editor, &line) {
                    eprintln!("error: {err:#}");
                }
                print_status(editor, out)?;
            }
            _ = sleep_for(wait) => {
                clock.sync(editor);
                print_status(editor, out)?;
            }
        }
    }
    Ok(())
}

/// Lets the remaining status timers fire in real time.
async fn wait_until_idle(
    editor: &mut Editor,
    clock: &mut WallClock,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    while let Some(wait) = editor.time_until_next() {
        tokio::time::sleep(wait).await;
        clock.sync(editor);
        print_status(editor, out)?;
    }
    Ok(())
}

async fn sleep_for(wait: Option<Duration>) {
    match wait {
        Some(wait) => tokio::time::sleep(wait).await,
        None => std::future::pending().await,
    }
}

/// Feeds elapsed wall-clock time into the editor's virtual clock.
struct WallClock {
    last: Instant,
}

impl WallClock {
    fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    fn sync(&mut self, editor: &mut Editor) {
        let now = Instant::now();
        editor.advance(now - self.last);
        self.last = now;
    }
}

fn print_status(editor: &Editor, out: &mut impl Write) -> std::io::Result<()> {
    if let Some(command_line) = StatusBar::command_line(editor) {
        writeln!(out, "{command_line}")?;
    }
    if editor.graph_visible() {
        let id = editor.active_file();
        writeln!(out, "graph: {id} -- {}", editor.neighbours().join(", "))?;
    }
    writeln!(out, "{}", StatusBar::render(editor))
}

fn print_document(editor: &Editor, color: bool, out: &mut impl Write) -> std::io::Result<()> {
    let text = editor.text();
    if !color {
        return writeln!(out, "{text}");
    }

    for (line, tokens) in text.split('\n').zip(highlight(&text)) {
        for token in tokens {
            let (r, g, b) = hex_rgb(token.style.color());
            write!(out, "\x1b[38;2;{r};{g};{b}m{}", &line[token.span])?;
        }
        writeln!(out, "\x1b[0m")?;
    }
    Ok(())
}

/// Parses `#rrggbb`; anything malformed is white.
fn hex_rgb(hex: &str) -> (u8, u8, u8) {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0xff)
    };
    (channel(1), channel(3), channel(5))
}
