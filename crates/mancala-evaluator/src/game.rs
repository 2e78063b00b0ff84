//! A single game between a network seat and a baseline seat.

use mancala_engine::{Environment, MoveOutcome, Player, Score};

use crate::{EvaluationError, policy::MovePolicy};

/// How a finished game went for the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win,
    Loss,
    Draw,
}

/// Final state of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub network_seat: Player,
    pub score: Score,
    /// Accepted moves by both seats, extra turns included.
    pub moves: usize,
}

impl GameResult {
    /// Outcome for the network's seat. Equal totals are a draw.
    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        match self.score.winner() {
            Some(winner) if winner == self.network_seat => GameOutcome::Win,
            Some(_) => GameOutcome::Loss,
            None => GameOutcome::Draw,
        }
    }
}

/// Plays `env` to the end, starting with player 0.
///
/// `network` moves for `network_seat`; `baseline` moves for the other seat.
/// Whoever the environment names after each move plays next, so extra turns
/// are honoured.
pub fn play_game<E, N, B>(
    env: &mut E,
    network_seat: Player,
    network: &mut N,
    baseline: &mut B,
) -> Result<GameResult, EvaluationError>
where
    E: Environment + ?Sized,
    N: MovePolicy,
    B: MovePolicy,
{
    let mut player = Player::Zero;
    let mut moves = 0;
    loop {
        let played = if player == network_seat {
            network.play_turn(env, player)?
        } else {
            baseline.play_turn(env, player)?
        };
        moves += 1;
        match played.outcome {
            MoveOutcome::Continue(next) => player = next,
            MoveOutcome::Terminal => break,
            MoveOutcome::Invalid => {}
        }
    }
    Ok(GameResult {
        network_seat,
        score: env.final_score(),
        moves,
    })
}
