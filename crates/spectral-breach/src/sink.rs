//! Destinations for emitted scan events.

use crate::event::{EventKind, ScanEvent};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

/// Receives events emitted by a module.
pub trait EventSink: Send + Sync {
    /// Deliver one event. Must not fail the caller.
    fn notify(&self, event: ScanEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn notify(&self, event: ScanEvent) {
        (**self).notify(event);
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ScanEvent>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far.
    #[must_use]
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Payloads of the received events of one kind, in arrival order.
    #[must_use]
    pub fn data_of(&self, kind: EventKind) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| event.kind == kind)
            .map(|event| event.data.clone())
            .collect()
    }

    /// Number of events received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no events were received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn notify(&self, event: ScanEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Forwards events onto a tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ScanEvent>,
}

impl ChannelSink {
    /// Wrap the sending half of a channel.
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<ScanEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn notify(&self, event: ScanEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Dropped {} event, receiver closed", e.0.kind);
        }
    }
}
