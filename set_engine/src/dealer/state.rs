//! Game-wide flags written by the dealer and read by every task.

use serde::Serialize;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::utils::lock;

/// Dealer state machine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DealerPhase {
    Dealing,
    Countdown,
    Reshuffling,
    Ended,
}

impl fmt::Display for DealerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealerPhase::Dealing => write!(f, "dealing"),
            DealerPhase::Countdown => write!(f, "countdown"),
            DealerPhase::Reshuffling => write!(f, "reshuffling"),
            DealerPhase::Ended => write!(f, "ended"),
        }
    }
}

/// Game state record.
///
/// `can_play` and `terminate` are watch channels so waiting tasks wake up
/// on every change instead of polling.
#[derive(Debug)]
pub struct GameState {
    /// Claims are accepted
    can_play: watch::Sender<bool>,

    /// Shutdown broadcast
    terminate: watch::Sender<bool>,

    /// No legal set remains among grid and deck
    finished: AtomicBool,

    phase: watch::Sender<DealerPhase>,

    /// When the grid gets reshuffled
    deadline: Mutex<Instant>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            can_play: watch::Sender::new(false),
            terminate: watch::Sender::new(false),
            finished: AtomicBool::new(false),
            phase: watch::Sender::new(DealerPhase::Dealing),
            deadline: Mutex::new(Instant::now()),
        }
    }

    pub fn can_play(&self) -> bool {
        *self.can_play.borrow()
    }

    pub(crate) fn set_can_play(&self, open: bool) {
        self.can_play.send_if_modified(|current| {
            let changed = *current != open;
            *current = open;
            changed
        });
    }

    /// Receiver observing claim acceptance
    pub fn play_gate(&self) -> watch::Receiver<bool> {
        self.can_play.subscribe()
    }

    pub fn is_terminated(&self) -> bool {
        *self.terminate.borrow()
    }

    pub(crate) fn request_terminate(&self) {
        self.can_play.send_replace(false);
        self.terminate.send_replace(true);
    }

    /// Receiver observing the shutdown broadcast
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.terminate.subscribe()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub(crate) fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }

    /// Whether the dealer should leave its cycle
    pub fn should_finish(&self) -> bool {
        self.is_terminated() || self.is_finished()
    }

    pub fn phase(&self) -> DealerPhase {
        *self.phase.borrow()
    }

    pub(crate) fn set_phase(&self, phase: DealerPhase) {
        let previous = self.phase.send_replace(phase);
        if previous != phase {
            log::debug!("Dealer phase {previous} -> {phase}");
        }
    }

    /// Receiver observing phase changes
    pub fn phase_watch(&self) -> watch::Receiver<DealerPhase> {
        self.phase.subscribe()
    }

    /// Move the reshuffle deadline to `timeout` from now
    pub(crate) fn reset_deadline(&self, timeout: Duration) {
        *lock(&self.deadline) = Instant::now() + timeout;
    }

    pub fn deadline(&self) -> Instant {
        *lock(&self.deadline)
    }

    /// Time left until the reshuffle, zero once the deadline passed
    pub fn time_left(&self) -> Duration {
        self.deadline().saturating_duration_since(Instant::now())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait until the watched flag is raised. A dropped sender counts as raised.
pub(crate) async fn wait_for_shutdown(signal: &mut watch::Receiver<bool>) {
    let _ = signal.wait_for(|terminated| *terminated).await;
}

/// Wait until claims are accepted; `false` if the gate's sender is gone
pub(crate) async fn wait_until_open(gate: &mut watch::Receiver<bool>) -> bool {
    gate.wait_for(|open| *open).await.is_ok()
}
