//! Event dispatch for controller notifications
//!
//! Provides a thin broadcast dispatcher so a hosting system can fan the
//! notifications produced by a controller out to several subscribers.

use tokio::sync::broadcast;

/// Event dispatcher for publishing events to subscribers
#[derive(Debug, Clone)]
pub struct EventDispatcher<E: Clone> {
    /// Broadcast sender channel.
    tx: broadcast::Sender<E>,
}

impl<E: Clone> EventDispatcher<E> {
    /// Create a new event dispatcher
    ///
    /// # Arguments
    /// * `buffer_size` - Size of the broadcast buffer (must be > 0)
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size.max(1));
        Self { tx }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of subscribers that received it. Publishing
    /// without subscribers is not an error; the event is dropped.
    pub fn publish(&self, event: E) -> usize {
        match self.tx.send(event) {
            Ok(count) => count,
            Err(_) => {
                tracing::trace!("Dropping event, no subscribers");
                0
            }
        }
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<E: Clone> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new(100)
    }
}
