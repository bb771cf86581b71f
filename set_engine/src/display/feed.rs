//! Fan-out of display events to subscriber channels.

use std::sync::Mutex;
use tokio::sync::mpsc;

use super::{DisplayEvent, DisplayObserver};
use crate::utils::lock;

/// Display observer forwarding every event to its subscribers.
///
/// Sending never blocks: a subscriber whose channel is full misses the
/// event, a subscriber whose receiver was dropped is removed.
#[derive(Debug, Default)]
pub struct EventFeed {
    subscribers: Mutex<Vec<mpsc::Sender<DisplayEvent>>>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all future events
    ///
    /// # Arguments
    ///
    /// * `capacity` - Events buffered before new ones are dropped
    pub fn subscribe(&self, capacity: usize) -> mpsc::Receiver<DisplayEvent> {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        lock(&self.subscribers).push(sender);
        receiver
    }

    /// Get current subscriber count
    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }
}

impl DisplayObserver for EventFeed {
    fn notify(&self, event: DisplayEvent) {
        lock(&self.subscribers).retain(|sender| match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("Display subscriber channel full, dropping event: {event}");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::debug!("Display subscriber disconnected, removing");
                false
            }
        });
    }
}
