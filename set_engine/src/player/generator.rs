//! Random slot requests for automated players.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, watch};

use crate::dealer::state::{wait_for_shutdown, wait_until_open};
use crate::table::{PlayerId, Slot};

/// Feeds an automated player's queue with uniformly random slots.
///
/// Waits for queue capacity through `reserve`, so a full queue suspends the
/// generator until the player loop consumes a request.
pub struct Generator {
    player: PlayerId,
    requests: mpsc::Sender<Slot>,
    table_size: usize,
    gate: watch::Receiver<bool>,
    shutdown: watch::Receiver<bool>,
    rng: StdRng,
}

impl Generator {
    pub fn new(
        player: PlayerId,
        requests: mpsc::Sender<Slot>,
        table_size: usize,
        gate: watch::Receiver<bool>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            player,
            requests,
            table_size,
            gate,
            shutdown,
            rng: StdRng::from_os_rng(),
        }
    }

    pub async fn run(mut self) {
        log::debug!("Generator for player {} starting", self.player);

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            let open = tokio::select! {
                _ = wait_for_shutdown(&mut self.shutdown) => break,
                open = wait_until_open(&mut self.gate) => open,
            };
            if !open {
                break;
            }

            let permit = tokio::select! {
                _ = wait_for_shutdown(&mut self.shutdown) => break,
                permit = self.requests.reserve() => permit,
            };
            // Player loop dropped its receiver
            let Ok(permit) = permit else {
                break;
            };

            // Play may have closed while waiting for room
            if !*self.gate.borrow() {
                continue;
            }

            permit.send(self.rng.random_range(0..self.table_size));
        }

        log::debug!("Generator for player {} stopped", self.player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_generator_stops_at_capacity() {
        let (gate_tx, gate) = watch::channel(true);
        let (shutdown_tx, shutdown) = watch::channel(false);
        let (tx, mut rx) = mpsc::channel(3);

        let task = tokio::spawn(Generator::new(0, tx, 12, gate, shutdown).run());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(rx.len(), 3);

        // Nothing more while the queue stays full
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(rx.len(), 3);

        let slot = rx.recv().await.unwrap();
        assert!(slot < 12);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(rx.len(), 3);

        shutdown_tx.send_replace(true);
        task.await.unwrap();
        drop(gate_tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generator_waits_for_open_play() {
        let (gate_tx, gate) = watch::channel(false);
        let (shutdown_tx, shutdown) = watch::channel(false);
        let (tx, rx) = mpsc::channel(3);

        let task = tokio::spawn(Generator::new(1, tx, 12, gate, shutdown).run());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.is_empty());

        gate_tx.send_replace(true);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(rx.len(), 3);

        shutdown_tx.send_replace(true);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_generator_exits_when_player_is_gone() {
        let (_gate_tx, gate) = watch::channel(true);
        let (_shutdown_tx, shutdown) = watch::channel(false);
        let (tx, rx) = mpsc::channel(3);
        drop(rx);

        Generator::new(2, tx, 12, gate, shutdown).run().await;
    }
}
