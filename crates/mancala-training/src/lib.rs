//! Training Mancala networks.
//!
//! Two independent training modes are provided:
//!
//! - **Genetic** ([`genetic`]) - A population of networks evolves by tournament
//!   selection, whole arithmetic recombination and uniform-reset mutation.
//!   Fitness is the win rate against a random opponent (see `mancala-evaluator`).
//! - **Online** ([`reinforce`]) - A single network plays the random opponent and
//!   is trained after every game with reward-weighted backpropagation.
//!
//! # How Evolution Works
//!
//! ```text
//! Population (P networks)
//!     ↓ compute_fitness       (win rate of every member)
//! FitnessRecord
//!     ↓ tournament_select     (mating pool)
//! Mating pool
//!     ↓ recombine             (child pool of 2P, mutated)
//! Child pool
//!     ↓ survival_select       (best P children, parents discarded)
//! Next population
//! ```
//!
//! Parameters live in [`params::EvolutionParams`]; the genetic operators on raw
//! weights live in [`operators`]; per-generation statistics in [`statistics`].
//!
//! # Current Limitations
//!
//! - **Fixed operators**: rank-based selection and blend recombination are not provided.
//! - **No persistence**: trained networks live only as long as the process.
//! - **Noisy fitness**: win rates against a random opponent vary between
//!   evaluations, so a member's rank is only as reliable as the number of games played.

use mancala_evaluator::EvaluationError;
use mancala_nn::NetworkError;

pub mod genetic;
pub mod operators;
pub mod params;
pub mod reinforce;
pub mod statistics;

/// A violated precondition of an evolutionary operator.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("{name} must be positive")]
    ZeroSize { name: &'static str },
    #[display("tournament size {tournament_size} must be smaller than the population size {population_size}")]
    TournamentTooLarge {
        tournament_size: usize,
        population_size: usize,
    },
    #[display("{name} must be a probability in {range}, got {value}")]
    ProbabilityOutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },
    #[display("survival selection needs more than {target_size} children, got {children}")]
    NotEnoughChildren { children: usize, target_size: usize },
    #[display("population holds {actual} members, expected {expected}")]
    PopulationSizeMismatch { expected: usize, actual: usize },
    #[display("fitness record holds {scores} scores for {members} members")]
    FitnessRecordMismatch { scores: usize, members: usize },
    #[display("networks have different architectures {left:?} and {right:?}")]
    ArchitectureMismatch { left: Vec<usize>, right: Vec<usize> },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EvolutionError {
    #[display("invalid configuration: {_0}")]
    InvalidConfiguration(ConfigurationError),
    #[display("evaluation failed: {_0}")]
    Evaluation(EvaluationError),
    #[display("cannot build network: {_0}")]
    Network(NetworkError),
}

impl From<ConfigurationError> for EvolutionError {
    fn from(error: ConfigurationError) -> Self {
        Self::InvalidConfiguration(error)
    }
}

impl From<EvaluationError> for EvolutionError {
    fn from(error: EvaluationError) -> Self {
        Self::Evaluation(error)
    }
}

impl From<NetworkError> for EvolutionError {
    fn from(error: NetworkError) -> Self {
        Self::Network(error)
    }
}
