//! Notifications about editor state changes.
//!
//! ## Learning: Broadcast Channels
//!
//! The editor does not hold a list of listeners. Each change is sent as
//! a plain value on a `tokio::sync::broadcast` channel, and anyone who
//! wants to follow along calls `subscribe` and gets their own receiver.
//! A slow receiver loses the oldest events instead of stalling the
//! editor.

use crate::mode::EditorMode;
use oxidevim_buffer::Position;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// How many undelivered events a receiver may fall behind by.
const CAPACITY: usize = 256;

/// A change worth telling subscribers about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    ModeChanged(EditorMode),
    CursorMoved(Position),
    /// Id of the file whose text changed
    DocumentChanged(String),
    /// Id of the file that became active
    FileOpened(String),
    /// `None` when the status segment was cleared
    StatusChanged(Option<String>),
    /// Whether the graph overlay is now shown
    GraphToggled(bool),
}

/// Fan-out sender shared by the editor and anything it hands a clone to.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self { tx }
    }

    /// Sends `event` to every live receiver. With no receivers the event
    /// is dropped.
    pub fn emit(&self, event: EditorEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event emitted with no subscribers");
        }
    }

    /// A receiver that sees every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps a receiver and skips over lag, so callers only see events or
/// the end of the stream.
///
/// ```ignore
/// let mut handler = EventHandler::new(editor.subscribe());
/// tokio::spawn(async move {
///     while let Some(EditorEvent::StatusChanged(Some(message))) = handler.next().await {
///         eprintln!("{message}");
///     }
/// });
/// ```
pub struct EventHandler {
    rx: broadcast::Receiver<EditorEvent>,
}

impl EventHandler {
    pub fn new(rx: broadcast::Receiver<EditorEvent>) -> Self {
        Self { rx }
    }

    /// Resolves to `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<EditorEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => break Some(event),
                Err(RecvError::Lagged(missed)) => warn_lagged(missed),
                Err(RecvError::Closed) => break None,
            }
        }
    }

    /// Non-blocking variant of [`next`](Self::next): `None` when nothing
    /// is queued right now.
    pub fn try_next(&mut self) -> Option<EditorEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => break Some(event),
                Err(TryRecvError::Lagged(missed)) => warn_lagged(missed),
                Err(TryRecvError::Empty | TryRecvError::Closed) => break None,
            }
        }
    }
}

fn warn_lagged(missed: u64) {
    tracing::warn!(missed, "event subscriber fell behind");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_emitted_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(EditorEvent::GraphToggled(true));
        assert_eq!(rx.recv().await.unwrap(), EditorEvent::GraphToggled(true));
    }

    #[tokio::test]
    async fn test_cloned_bus_reaches_all_subscribers() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.clone().subscribe();

        bus.emit(EditorEvent::ModeChanged(EditorMode::Insert));

        for rx in [&mut first, &mut second] {
            assert_eq!(
                rx.recv().await.unwrap(),
                EditorEvent::ModeChanged(EditorMode::Insert)
            );
        }
    }

    #[tokio::test]
    async fn test_handler_ends_when_bus_dropped() {
        let bus = EventBus::new();
        let mut handler = EventHandler::new(bus.subscribe());

        bus.emit(EditorEvent::StatusChanged(None));
        drop(bus);

        assert_eq!(handler.next().await, Some(EditorEvent::StatusChanged(None)));
        assert_eq!(handler.next().await, None);
    }

    #[test]
    fn test_try_next_drains_queue() {
        let bus = EventBus::default();
        let mut handler = EventHandler::new(bus.subscribe());
        assert_eq!(handler.try_next(), None);

        bus.emit(EditorEvent::FileOpened("lib.rs".to_string()));
        assert_eq!(
            handler.try_next(),
            Some(EditorEvent::FileOpened("lib.rs".to_string()))
        );
        assert_eq!(handler.try_next(), None);
    }

    #[test]
    fn test_lagging_handler_skips_to_newest() {
        let bus = EventBus::new();
        let mut handler = EventHandler::new(bus.subscribe());

        for line in 0..=CAPACITY {
            bus.emit(EditorEvent::CursorMoved(Position::new(line + 1, 1)));
        }

        assert_eq!(
            handler.try_next(),
            Some(EditorEvent::CursorMoved(Position::new(2, 1)))
        );
    }

    #[test]
    fn test_emit_without_subscribers() {
        EventBus::new().emit(EditorEvent::GraphToggled(false));
    }
}
