//! Shared grid of card slots and per-player claim sets.
//!
//! This module implements:
//! - Grid: the plain slot <-> card mapping and claim sets
//! - Table: the grid behind the single structural lock, with display
//!   notifications for every mutation
//!
//! ## Locking
//!
//! Placing and removing cards, toggling and clearing claims, hints, the
//! dealer's reshuffle sweep and claim arbitration all run under the same
//! lock. Guarded sections never await and never call back into the engine.

pub mod board;
pub mod grid;

pub use board::{Hint, Table};
pub use grid::{Card, ClaimToggle, Grid, PlayerId, Slot};
