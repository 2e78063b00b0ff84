//! Mancala rules engine.
//!
//! The learning crates never reach into the board directly: they drive a game
//! through the [`Environment`] trait, which exposes exactly four operations
//! (apply a move, observe the board, read the final score, test for the end of
//! the game). [`Board`] is the concrete implementation.
//!
//! # Example
//!
//! ```
//! use mancala_engine::{Board, Environment, MoveOutcome, Pit, Player};
//!
//! let mut board = Board::new();
//! let pit = Pit::new(4).unwrap();
//! assert_eq!(board.apply_move(Player::Zero, pit), MoveOutcome::Continue(Player::Zero));
//! assert_eq!(board.apply_move(Player::Zero, pit), MoveOutcome::Invalid);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A game as seen by a move-selection policy.
pub trait Environment {
    /// Plays `pit` for `player`.
    ///
    /// Choosing an empty pit is not an error: the board is left untouched and
    /// [`MoveOutcome::Invalid`] is returned so the same player can choose again.
    fn apply_move(&mut self, player: Player, pit: Pit) -> MoveOutcome;

    /// Returns the full board in fixed cell order.
    fn observe(&self) -> Observation;

    /// Returns each player's store plus the marbles left in their row.
    fn final_score(&self) -> Score;

    /// Returns `true` once either row is empty.
    fn is_terminal(&self) -> bool;
}
