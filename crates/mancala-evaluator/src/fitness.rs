//! Session evaluation: a network's win rate against a baseline.
//!
//! The fitness of a network is the fraction of games it wins out of a fixed
//! number of complete games, each on a fresh [`Board`]. Draws count as
//! non-wins, so fitness is always in `[0, 1]`.
//!
//! Against [`RandomPolicy`] the score is stochastic: two evaluations of the
//! same network agree only if their random sources are seeded identically.
//!
//! # Usage
//!
//! ```
//! use mancala_evaluator::fitness::{Evaluator, Seating};
//! use mancala_nn::Network;
//! use rand::SeedableRng as _;
//!
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
//! let network = Network::random(&[15, 6, 6], 0.5, &mut rng).unwrap();
//! let evaluator = Evaluator::new(10, Seating::Alternate);
//! let fitness = evaluator.fitness(&network, &mut rng).unwrap();
//! assert!((0.0..=1.0).contains(&fitness));
//! ```

use std::{fmt, str::FromStr};

use mancala_engine::{Board, Player};
use mancala_nn::Network;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    EvaluationError,
    game::{GameOutcome, GameResult, play_game},
    policy::{MovePolicy, NetworkPolicy, RandomPolicy},
};

/// Which seat the network takes in each game of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seating {
    /// The same seat for every game of the run.
    Fixed(Player),
    /// Seat 0 in the first game, then swapping every game.
    Alternate,
}

impl Default for Seating {
    fn default() -> Self {
        Self::Fixed(Player::Zero)
    }
}

impl Seating {
    /// Seat of the network in the `game`-th game (zero-based).
    #[must_use]
    pub fn seat_for_game(self, game: usize) -> Player {
        match self {
            Self::Fixed(seat) => seat,
            Self::Alternate if game % 2 == 0 => Player::Zero,
            Self::Alternate => Player::One,
        }
    }
}

impl fmt::Display for Seating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(seat) => write!(f, "fixed-{}", seat.index()),
            Self::Alternate => f.write_str("alternate"),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown seating {input:?}, expected fixed-0, fixed-1 or alternate")]
pub struct ParseSeatingError {
    input: String,
}

impl FromStr for Seating {
    type Err = ParseSeatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed-0" => Ok(Self::Fixed(Player::Zero)),
            "fixed-1" => Ok(Self::Fixed(Player::One)),
            "alternate" => Ok(Self::Alternate),
            _ => Err(ParseSeatingError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Tally of an evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl MatchSummary {
    pub fn record(&mut self, result: &GameResult) {
        self.games += 1;
        match result.outcome() {
            GameOutcome::Win => self.wins += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::Loss => self.losses += 1,
        }
    }

    /// `wins / games`, or 0 when no game was played.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

/// Scores networks by playing them against a baseline policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    games: usize,
    seating: Seating,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GAMES, Seating::default())
    }
}

impl Evaluator {
    /// Games per evaluation unless configured otherwise.
    pub const DEFAULT_GAMES: usize = 100;

    #[must_use]
    pub const fn new(games: usize, seating: Seating) -> Self {
        Self { games, seating }
    }

    #[must_use]
    pub const fn games(&self) -> usize {
        self.games
    }

    #[must_use]
    pub const fn seating(&self) -> Seating {
        self.seating
    }

    /// Plays every game of the run and tallies the results.
    pub fn play<B>(&self, network: &Network, baseline: &mut B) -> Result<MatchSummary, EvaluationError>
    where
        B: MovePolicy,
    {
        let mut policy = NetworkPolicy::new(network)?;
        let mut summary = MatchSummary::default();
        for game in 0..self.games {
            let mut board = Board::new();
            let seat = self.seating.seat_for_game(game);
            let result = play_game(&mut board, seat, &mut policy, baseline)?;
            summary.record(&result);
        }
        tracing::debug!(
            games = summary.games,
            wins = summary.wins,
            draws = summary.draws,
            losses = summary.losses,
            "evaluation finished"
        );
        Ok(summary)
    }

    /// Fraction of games won against `baseline`.
    pub fn win_rate<B>(&self, network: &Network, baseline: &mut B) -> Result<f64, EvaluationError>
    where
        B: MovePolicy,
    {
        Ok(self.play(network, baseline)?.win_rate())
    }

    /// Fraction of games won against a [`RandomPolicy`] drawing from `rng`.
    pub fn fitness<R>(&self, network: &Network, rng: &mut R) -> Result<f64, EvaluationError>
    where
        R: Rng + ?Sized,
    {
        self.win_rate(network, &mut RandomPolicy::new(rng))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_alternate_seating() {
        let seats: Vec<Player> = (0..4).map(|g| Seating::Alternate.seat_for_game(g)).collect();
        assert_eq!(seats, vec![Player::Zero, Player::One, Player::Zero, Player::One]);
        assert!((0..4).all(|g| Seating::default().seat_for_game(g) == Player::Zero));
    }

    #[test]
    fn test_seating_text_and_json() {
        for seating in [Seating::Fixed(Player::Zero), Seating::Fixed(Player::One), Seating::Alternate] {
            assert_eq!(seating.to_string().parse::<Seating>().unwrap(), seating);
        }
        assert!("fixed-2".parse::<Seating>().is_err());
        assert_eq!(
            serde_json::to_string(&Seating::Fixed(Player::One)).unwrap(),
            r#"{"fixed":1}"#
        );
        let seating: Seating = serde_json::from_str(r#""alternate""#).unwrap();
        assert_eq!(seating, Seating::Alternate);
    }

    #[test]
    fn test_summary_counts_every_game() {
        let mut rng = Pcg32::seed_from_u64(11);
        let network = Network::random(&[15, 8, 6], 0.5, &mut rng).unwrap();
        let evaluator = Evaluator::new(30, Seating::Alternate);
        let summary = evaluator.play(&network, &mut RandomPolicy::new(&mut rng)).unwrap();
        assert_eq!(summary.games, 30);
        assert_eq!(summary.wins + summary.draws + summary.losses, 30);
    }

    #[test]
    fn test_fitness_is_reproducible_with_same_seed() {
        let network = Network::random(&[15, 10, 6], 0.5, &mut Pcg32::seed_from_u64(5)).unwrap();
        let evaluator = Evaluator::new(20, Seating::default());
        let a = evaluator.fitness(&network, &mut Pcg32::seed_from_u64(9)).unwrap();
        let b = evaluator.fitness(&network, &mut Pcg32::seed_from_u64(9)).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
        assert!((0.0..=1.0).contains(&a));
    }

    #[test]
    fn test_seeded_network_against_random_baseline() {
        let network = Network::random(&[15, 6, 6], 0.5, &mut Pcg32::seed_from_u64(2024)).unwrap();
        let evaluator = Evaluator::new(50, Seating::default());
        let fitness = evaluator.fitness(&network, &mut Pcg32::seed_from_u64(77)).unwrap();
        assert!(fitness > 0.0 && fitness < 1.0, "fitness {fitness}");
    }

    #[test]
    fn test_incompatible_network() {
        let network = Network::random(&[15, 5], 0.5, &mut Pcg32::seed_from_u64(1)).unwrap();
        let err = Evaluator::default()
            .fitness(&network, &mut Pcg32::seed_from_u64(1))
            .unwrap_err();
        assert_eq!(err, EvaluationError::IncompatibleNetwork { input: 15, output: 5 });
    }

    #[test]
    fn test_empty_summary_win_rate() {
        assert_eq!(MatchSummary::default().win_rate(), 0.0);
    }
}
