//! Thread-safe event bus using mpsc channels.
//!
//! Any thread can publish via `EventPublisher::publish()`; the overlay
//! coordinator drains pending events once per tick via `EventBus::drain()`.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::types::OverlayEvent;

/// Multi-producer, single-consumer event queue.
///
/// The activation hook, drag loop and window host each hold a cloned
/// [`EventPublisher`]; the overlay tick is the single consumer.
pub struct EventBus {
    sender: Sender<OverlayEvent>,
    receiver: Receiver<OverlayEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// Get a publisher handle that can be cloned and sent to other threads.
    pub fn publisher(&self) -> EventPublisher {
        EventPublisher {
            sender: self.sender.clone(),
        }
    }

    /// Receive the next event without blocking, if one is pending.
    pub fn try_recv(&self) -> Option<OverlayEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain all pending events, preserving publish order.
    pub fn drain(&self) -> Vec<OverlayEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable, thread-safe publisher side of the bus.
#[derive(Clone)]
pub struct EventPublisher {
    sender: Sender<OverlayEvent>,
}

impl EventPublisher {
    /// Publish an event. Non-blocking; if the receiver is gone the overlay
    /// is shutting down and the event is intentionally dropped.
    pub fn publish(&self, event: OverlayEvent) {
        let _ = self.sender.send(event);
    }
}
