//! The dealer: deck, game state flags, claim arbitration and the game loop.
//!
//! [`DealerActor`] runs the game in its own task. [`DealerHandle`] is shared
//! with every player task and is the only way to arbitrate a claim or to end
//! the game early.

pub mod actor;
pub mod deck;
pub mod handle;
pub mod state;

pub use actor::DealerActor;
pub use deck::Deck;
pub use handle::{ClaimOutcome, DealerHandle};
pub use state::{DealerPhase, GameState};
