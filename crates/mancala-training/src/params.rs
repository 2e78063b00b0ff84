//! Evolution parameters.
//!
//! Every field has a default, so a JSON configuration only needs to name the
//! values it changes:
//!
//! ```
//! use mancala_training::params::EvolutionParams;
//!
//! let params: EvolutionParams = serde_json::from_str(r#"{ "population_size": 20 }"#).unwrap();
//! assert_eq!(params.population_size, 20);
//! assert_eq!(params.tournament_size, 3);
//! assert_eq!(params.child_pool_size(), 40);
//! params.validate().unwrap();
//! ```

use mancala_evaluator::fitness::{Evaluator, Seating};
use serde::{Deserialize, Serialize};

use crate::{ConfigurationError, operators::WHOLE_ARITHMETIC_ALPHA};

pub const POPULATION_SIZE: usize = 100;
pub const TOURNAMENT_SIZE: usize = 3;
pub const MATING_POOL_SIZE: usize = 30;
pub const P_BEST: f64 = 0.5;
pub const CHILD_POOL_FACTOR: usize = 2;
pub const MUTATION_PROBABILITY: f64 = 0.05;

/// Controls one generational step of the genetic algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolutionParams {
    /// Members kept between generations
    pub population_size: usize,
    /// Members drawn (without replacement) for each tournament
    pub tournament_size: usize,
    /// Parents selected per generation
    pub mating_pool_size: usize,
    /// Probability that a tournament winner is accepted into the mating pool
    pub p_best: f64,
    /// Children produced per generation, as a multiple of the population size
    pub child_pool_factor: usize,
    /// Per-weight probability of a uniform reset
    pub mutation_probability: f64,
    /// Weight of the first parent in whole arithmetic recombination
    pub recombination_alpha: f64,
    /// Games played to score one member
    pub games_per_evaluation: usize,
    /// Seat of the network during evaluation
    pub seating: Seating,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: POPULATION_SIZE,
            tournament_size: TOURNAMENT_SIZE,
            mating_pool_size: MATING_POOL_SIZE,
            p_best: P_BEST,
            child_pool_factor: CHILD_POOL_FACTOR,
            mutation_probability: MUTATION_PROBABILITY,
            recombination_alpha: WHOLE_ARITHMETIC_ALPHA,
            games_per_evaluation: Evaluator::DEFAULT_GAMES,
            seating: Seating::default(),
        }
    }
}

impl EvolutionParams {
    #[must_use]
    pub fn child_pool_size(&self) -> usize {
        self.population_size * self.child_pool_factor
    }

    #[must_use]
    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.games_per_evaluation, self.seating)
    }

    /// Checks every precondition of the generational pipeline.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("population size", self.population_size),
            ("tournament size", self.tournament_size),
            ("mating pool size", self.mating_pool_size),
            ("games per evaluation", self.games_per_evaluation),
        ] {
            if value == 0 {
                return Err(ConfigurationError::ZeroSize { name });
            }
        }
        if self.tournament_size >= self.population_size {
            return Err(ConfigurationError::TournamentTooLarge {
                tournament_size: self.tournament_size,
                population_size: self.population_size,
            });
        }
        check_probability("p_best", "(0, 1]", self.p_best, |p| p > 0.0 && p <= 1.0)?;
        check_probability(
            "mutation probability",
            "[0, 1]",
            self.mutation_probability,
            |p| (0.0..=1.0).contains(&p),
        )?;
        check_probability(
            "recombination alpha",
            "[0, 1]",
            self.recombination_alpha,
            |p| (0.0..=1.0).contains(&p),
        )?;
        if self.child_pool_size() <= self.population_size {
            return Err(ConfigurationError::NotEnoughChildren {
                children: self.child_pool_size(),
                target_size: self.population_size,
            });
        }
        Ok(())
    }
}

pub(crate) fn check_probability<F>(
    name: &'static str,
    range: &'static str,
    value: f64,
    accept: F,
) -> Result<(), ConfigurationError>
where
    F: FnOnce(f64) -> bool,
{
    if accept(value) {
        Ok(())
    } else {
        Err(ConfigurationError::ProbabilityOutOfRange { name, range, value })
    }
}

#[cfg(test)]
mod tests {
    use mancala_engine::Player;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = EvolutionParams::default();
        params.validate().unwrap();
        assert_eq!(params.child_pool_size(), 200);
        assert_eq!(params.evaluator().games(), 100);
    }

    #[test]
    fn test_tournament_must_be_smaller_than_population() {
        let params = EvolutionParams {
            population_size: 5,
            tournament_size: 5,
            ..EvolutionParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigurationError::TournamentTooLarge {
                tournament_size: 5,
                population_size: 5
            })
        );
    }

    #[test]
    fn test_child_pool_must_exceed_population() {
        let params = EvolutionParams {
            child_pool_factor: 1,
            ..EvolutionParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigurationError::NotEnoughChildren { .. })
        ));
    }

    #[test]
    fn test_probabilities_are_checked() {
        for params in [
            EvolutionParams {
                p_best: 0.0,
                ..EvolutionParams::default()
            },
            EvolutionParams {
                mutation_probability: 1.5,
                ..EvolutionParams::default()
            },
            EvolutionParams {
                recombination_alpha: f64::NAN,
                ..EvolutionParams::default()
            },
        ] {
            assert!(matches!(
                params.validate(),
                Err(ConfigurationError::ProbabilityOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_zero_sizes_are_rejected() {
        let params = EvolutionParams {
            games_per_evaluation: 0,
            ..EvolutionParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigurationError::ZeroSize {
                name: "games per evaluation"
            })
        );
    }

    #[test]
    fn test_json_config() {
        let params: EvolutionParams =
            serde_json::from_str(r#"{ "mutation_probability": 0.1, "seating": { "fixed": 1 } }"#).unwrap();
        assert!((params.mutation_probability - 0.1).abs() < f64::EPSILON);
        assert_eq!(params.seating, Seating::Fixed(Player::One));
        assert_eq!(params.population_size, POPULATION_SIZE);

        let err = serde_json::from_str::<EvolutionParams>(r#"{ "population": 10 }"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }
}
