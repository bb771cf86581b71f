//! One-way notifications from the engine to a renderer.
//!
//! The engine never reads anything back from the display. Observers are
//! called synchronously, sometimes while the table lock is held, so an
//! implementation must return quickly and must not call back into the
//! engine.
//!
//! - [`LogDisplay`]: renders every event as a log line
//! - [`EventFeed`]: fans events out to subscriber channels

pub mod feed;
pub mod logger;

pub use self::feed::EventFeed;
pub use self::logger::LogDisplay;

use serde::Serialize;
use std::fmt;

use crate::table::{Card, PlayerId, Slot};

/// Something the display should reflect
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DisplayEvent {
    CardPlaced { card: Card, slot: Slot },
    CardRemoved { slot: Slot },
    ClaimPlaced { player: PlayerId, slot: Slot },
    ClaimRemoved { player: PlayerId, slot: Slot },
    ScoreChanged { player: PlayerId, score: u32 },
    /// Remaining freeze time of a player, zero once the freeze is over
    FreezeChanged { player: PlayerId, remaining_millis: u64 },
    Countdown { remaining_millis: u64, warn: bool },
    Winners(Vec<PlayerId>),
}

impl fmt::Display for DisplayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CardPlaced { card, slot } => write!(f, "card {card} placed in slot {slot}"),
            Self::CardRemoved { slot } => write!(f, "card removed from slot {slot}"),
            Self::ClaimPlaced { player, slot } => {
                write!(f, "player {player} claimed slot {slot}")
            }
            Self::ClaimRemoved { player, slot } => {
                write!(f, "player {player} released slot {slot}")
            }
            Self::ScoreChanged { player, score } => {
                write!(f, "player {player} score is {score}")
            }
            Self::FreezeChanged {
                player,
                remaining_millis,
            } => write!(f, "player {player} frozen for {remaining_millis}ms"),
            Self::Countdown {
                remaining_millis,
                warn,
            } => {
                if *warn {
                    write!(f, "countdown {remaining_millis}ms (hurry)")
                } else {
                    write!(f, "countdown {remaining_millis}ms")
                }
            }
            Self::Winners(players) => write!(f, "winners: {players:?}"),
        }
    }
}

/// Receives display notifications
pub trait DisplayObserver: Send + Sync {
    fn notify(&self, event: DisplayEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display_text() {
        let event = DisplayEvent::ClaimPlaced { player: 2, slot: 7 };
        assert_eq!(event.to_string(), "player 2 claimed slot 7");

        let warn = DisplayEvent::Countdown {
            remaining_millis: 900,
            warn: true,
        };
        assert_eq!(warn.to_string(), "countdown 900ms (hurry)");

        let winners = DisplayEvent::Winners(vec![0, 3]);
        assert_eq!(winners.to_string(), "winners: [0, 3]");
    }
}
