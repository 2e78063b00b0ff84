//! Game state and move resolution.
//!
//! - [`Board`] - The 14-cell board implementing [`Environment`](crate::Environment)
//! - [`MoveOutcome`] - What happened after a move was applied
//! - [`Score`] - Final totals once the game is over

pub use self::{board::*, score::*};

mod board;
mod score;
