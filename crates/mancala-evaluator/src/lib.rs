//! Playing networks against a baseline and scoring them.
//!
//! This crate implements two levels of evaluation:
//!
//! 1. **Turn** ([`policy`]) - A [`MovePolicy`](policy::MovePolicy) chooses and plays one
//!    move, retrying on empty pits. [`NetworkPolicy`](policy::NetworkPolicy) ranks the six
//!    network outputs; [`RandomPolicy`](policy::RandomPolicy) draws pits uniformly.
//!
//! 2. **Session** ([`fitness`]) - An [`Evaluator`](fitness::Evaluator) plays a fixed number of
//!    complete games ([`game`]) and reports the network's win rate, the fitness used by
//!    the genetic algorithm in `mancala-training`.
//!
//! # Architecture
//!
//! ```text
//! Evaluator (win rate over N games)
//!     ↓ plays
//! play_game (one game on a fresh board)
//!     ↓ asks
//! MovePolicy (one turn for one seat)
//! ```
//!
//! # Network contract
//!
//! A network plays Mancala if it reads 15 values (the 14 board cells followed by
//! its seat index, see [`policy::network_input`]) and writes 6 values, one per pit.

use mancala_engine::Player;
use mancala_nn::NetworkError;

pub mod fitness;
pub mod game;
pub mod policy;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EvaluationError {
    #[display("network failed: {_0}")]
    Network(NetworkError),
    #[display("network maps {input} inputs to {output} outputs, a Mancala player needs 15 to 6")]
    IncompatibleNetwork { input: usize, output: usize },
    #[display("{seat} has no legal move")]
    NoLegalMove { seat: Player },
}

impl From<NetworkError> for EvaluationError {
    fn from(error: NetworkError) -> Self {
        Self::Network(error)
    }
}
