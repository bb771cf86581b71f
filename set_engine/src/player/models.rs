//! Player records shared between the player task and the outside world.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::table::{PlayerId, Slot};
use crate::utils::lock;

/// Cheap handle to a player. Clones share the same record.
#[derive(Clone, Debug)]
pub struct PlayerHandle {
    inner: Arc<PlayerRecord>,
}

#[derive(Debug)]
struct PlayerRecord {
    id: PlayerId,
    human: bool,
    score: AtomicU32,
    /// End of the current freeze, if any
    frozen_until: Mutex<Option<Instant>>,
    /// Bounded queue of slot requests, capacity `feature_size`
    queue: mpsc::Sender<Slot>,
}

impl PlayerHandle {
    pub(crate) fn new(id: PlayerId, human: bool, queue: mpsc::Sender<Slot>) -> Self {
        Self {
            inner: Arc::new(PlayerRecord {
                id,
                human,
                score: AtomicU32::new(0),
                frozen_until: Mutex::new(None),
                queue,
            }),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.inner.id
    }

    pub fn is_human(&self) -> bool {
        self.inner.human
    }

    pub fn score(&self) -> u32 {
        self.inner.score.load(Ordering::Acquire)
    }

    pub fn is_frozen(&self) -> bool {
        lock(&self.inner.frozen_until).is_some_and(|until| until > Instant::now())
    }

    /// Queue a slot request without waiting. Returns `false` when the queue
    /// is full or the player task is gone.
    pub fn key_pressed(&self, slot: Slot) -> bool {
        match self.inner.queue.try_send(slot) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::trace!("Player {} queue full, dropping slot {slot}", self.inner.id);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Requests waiting in the queue
    pub fn queued(&self) -> usize {
        self.inner.queue.max_capacity() - self.inner.queue.capacity()
    }

    /// Add one point, returning the new score
    pub(crate) fn award_point(&self) -> u32 {
        self.inner.score.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn set_frozen_until(&self, until: Option<Instant>) {
        *lock(&self.inner.frozen_until) = until;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_award_point_increments() {
        let (tx, _rx) = mpsc::channel(3);
        let player = PlayerHandle::new(4, true, tx);
        assert_eq!(player.score(), 0);
        assert_eq!(player.award_point(), 1);
        assert_eq!(player.award_point(), 2);
        assert_eq!(player.clone().score(), 2);
    }

    #[test]
    fn test_key_pressed_respects_capacity() {
        let (tx, mut rx) = mpsc::channel(3);
        let player = PlayerHandle::new(0, true, tx);

        assert!(player.key_pressed(1));
        assert!(player.key_pressed(2));
        assert!(player.key_pressed(3));
        assert!(!player.key_pressed(4));
        assert_eq!(player.queued(), 3);

        assert_eq!(rx.try_recv(), Ok(1));
        assert_eq!(player.queued(), 2);
        assert!(player.key_pressed(4));

        drop(rx);
        assert!(!player.key_pressed(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_freeze_expires() {
        let (tx, _rx) = mpsc::channel(3);
        let player = PlayerHandle::new(0, false, tx);
        assert!(!player.is_frozen());

        player.set_frozen_until(Some(Instant::now() + Duration::from_secs(2)));
        assert!(player.is_frozen());

        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(!player.is_frozen());
    }
}
