//! Notification channel between a running download and its consumer
//!
//! The channel is unbounded and single-consumer: events arrive in emission order
//! and none are coalesced or dropped. Dropping the [`EventStream`] unsubscribes;
//! senders keep working and their events are discarded.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

use crate::types::Event;

/// Create a connected sender/stream pair
pub fn event_channel() -> (EventSender, EventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventStream { rx })
}

/// Producer half, cheap to clone into hooks and tasks
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventSender {
    /// Emit an event; a no-op once the consumer is gone
    pub fn send(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event dropped, no subscriber");
        }
    }

    /// Emit [`Event::Progress`]
    pub fn progress(&self, percent: u8) {
        self.send(Event::progress(percent));
    }

    /// Emit [`Event::Status`]
    pub fn status(&self, message: impl Into<String>) {
        self.send(Event::status(message));
    }

    /// Emit [`Event::Error`]
    pub fn error(&self, message: impl Into<String>) {
        self.send(Event::error(message));
    }

    /// Emit [`Event::Finished`]
    pub fn finished(&self, success: bool) {
        self.send(Event::finished(success));
    }

    /// Whether the consumer dropped its stream
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half
///
/// Usable either with [`EventStream::recv`] or as a [`futures::Stream`].
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventStream {
    /// Wait for the next event; `None` once every sender is dropped
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Take an event if one is already queued
    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Drain everything queued right now
    pub fn drain(&mut self) -> Vec<Event> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.rx.poll_recv(cx)
    }
}
