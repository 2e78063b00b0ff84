//! Turn-level move selection.
//!
//! A [`MovePolicy`] plays exactly one accepted move for one seat. Empty pits
//! are a normal part of play, not an error: the environment answers
//! [`MoveOutcome::Invalid`] and the policy moves on to its next candidate.
//!
//! - [`NetworkPolicy`] asks a network for six activations and tries the pits
//!   from the highest activation down, so the network never has to learn which
//!   pits are empty.
//! - [`RandomPolicy`] draws a pit uniformly from 1 to 6 and redraws until the
//!   move is accepted. It is the baseline opponent for fitness evaluation.

use std::iter;

use arrayvec::ArrayVec;
use mancala_engine::{CELL_COUNT, Environment, MoveOutcome, Observation, Pit, Player};
use mancala_nn::Network;
use rand::Rng;

use crate::EvaluationError;

/// Width of a network input: every board cell plus the seat indicator.
pub const INPUT_LEN: usize = CELL_COUNT + 1;

/// Width of a network output: one activation per pit.
pub const OUTPUT_LEN: usize = Pit::COUNT;

/// A move the environment accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub pit: Pit,
    pub outcome: MoveOutcome,
}

/// Chooses and plays one move for a seat.
pub trait MovePolicy {
    /// Plays one move for `seat`, skipping pits the environment rejects.
    ///
    /// The returned outcome is never [`MoveOutcome::Invalid`].
    fn play_turn<E>(&mut self, env: &mut E, seat: Player) -> Result<PlayedMove, EvaluationError>
    where
        E: Environment + ?Sized;
}

/// Builds the network input for `seat`: the 14 board cells followed by the seat index.
#[must_use]
pub fn network_input(observation: &Observation, seat: Player) -> Vec<f64> {
    #[expect(clippy::cast_precision_loss)]
    let seat_index = seat.index() as f64;
    observation
        .cells()
        .iter()
        .map(|&m| f64::from(m))
        .chain(iter::once(seat_index))
        .collect()
}

/// Orders pits by descending activation; equal activations keep pit order.
#[must_use]
pub fn rank_pits(output: &[f64]) -> ArrayVec<Pit, OUTPUT_LEN> {
    let mut ranked: ArrayVec<(Pit, f64), OUTPUT_LEN> = Pit::ALL.into_iter().zip(output.iter().copied()).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().map(|(pit, _)| pit).collect()
}

/// Applies the candidates in order until one is accepted.
///
/// Returns `None` if every candidate was rejected.
pub fn apply_first_legal<E, I>(env: &mut E, seat: Player, candidates: I) -> Option<PlayedMove>
where
    E: Environment + ?Sized,
    I: IntoIterator<Item = Pit>,
{
    candidates.into_iter().find_map(|pit| match env.apply_move(seat, pit) {
        MoveOutcome::Invalid => None,
        outcome => Some(PlayedMove { pit, outcome }),
    })
}

/// Plays the highest-ranked legal pit according to a network.
#[derive(Debug, Clone, Copy)]
pub struct NetworkPolicy<'a> {
    network: &'a Network,
}

impl<'a> NetworkPolicy<'a> {
    /// Wraps `network`, which must map [`INPUT_LEN`] inputs to [`OUTPUT_LEN`] outputs.
    pub fn new(network: &'a Network) -> Result<Self, EvaluationError> {
        if network.input_len() != INPUT_LEN || network.output_len() != OUTPUT_LEN {
            return Err(EvaluationError::IncompatibleNetwork {
                input: network.input_len(),
                output: network.output_len(),
            });
        }
        Ok(Self { network })
    }

    #[must_use]
    pub fn network(&self) -> &'a Network {
        self.network
    }

    /// Pits in the order this policy would try them for `seat`.
    pub fn ranked_pits(
        &self,
        observation: &Observation,
        seat: Player,
    ) -> Result<ArrayVec<Pit, OUTPUT_LEN>, EvaluationError> {
        let output = self.network.infer(&network_input(observation, seat))?;
        Ok(rank_pits(&output))
    }
}

impl MovePolicy for NetworkPolicy<'_> {
    fn play_turn<E>(&mut self, env: &mut E, seat: Player) -> Result<PlayedMove, EvaluationError>
    where
        E: Environment + ?Sized,
    {
        let ranked = self.ranked_pits(&env.observe(), seat)?;
        apply_first_legal(env, seat, ranked).ok_or(EvaluationError::NoLegalMove { seat })
    }
}

/// Plays a uniformly random pit, redrawing after rejected moves.
#[derive(Debug, Clone)]
pub struct RandomPolicy<R> {
    rng: R,
}

impl<R> RandomPolicy<R>
where
    R: Rng,
{
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R> MovePolicy for RandomPolicy<R>
where
    R: Rng,
{
    fn play_turn<E>(&mut self, env: &mut E, seat: Player) -> Result<PlayedMove, EvaluationError>
    where
        E: Environment + ?Sized,
    {
        // redrawing forever would never end on an empty row
        if env.observe().row(seat).iter().all(|&m| m == 0) && !env.is_terminal() {
            return Err(EvaluationError::NoLegalMove { seat });
        }
        let rng = &mut self.rng;
        let draws = iter::repeat_with(|| Pit::ALL[rng.random_range(0..Pit::COUNT)]);
        apply_first_legal(env, seat, draws).ok_or(EvaluationError::NoLegalMove { seat })
    }
}
