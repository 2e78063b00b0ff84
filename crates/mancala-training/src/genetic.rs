//! Genetic algorithm evolving populations of networks.
//!
//! A [`Population`] holds networks that share one architecture. Each
//! generation of [`EvolutionEngine::step`] replaces it with the fittest
//! children of the previous generation; parents never survive.
//!
//! # Algorithm Overview
//!
//! 1. **Evaluate Fitness** - [`compute_fitness`] scores every member by its win
//!    rate against a random opponent
//! 2. **Tournament Selection** - [`tournament_select`] fills the mating pool
//! 3. **Recombination** - [`recombine`] blends random pairs from the pool into a
//!    child pool and mutates every child
//! 4. **Survival Selection** - [`survival_select`] scores the children and keeps
//!    the best `population_size` of them (μ,λ selection)
//!
//! # Genetic Operators
//!
//! ## Tournament Selection
//!
//! Draw `tournament_size` distinct members and take the fittest of them. The
//! winner is accepted into the mating pool with probability `p_best`, otherwise
//! the tournament is discarded and redrawn. A mating pool therefore always holds
//! exactly `mating_pool_size` parents, and may hold the same member many times.
//!
//! ## Whole Arithmetic Recombination and Uniform-Reset Mutation
//!
//! See [`operators`](crate::operators).
//!
//! # Parallelization
//!
//! Fitness evaluation runs one scoped thread per member. Every member plays
//! against its own random opponent seeded from the engine's generator, so a
//! run with a seeded engine is reproducible regardless of thread scheduling.
//!
//! # Example
//!
//! ```
//! use mancala_training::{genetic::EvolutionEngine, params::EvolutionParams};
//! use rand::SeedableRng as _;
//!
//! let params = EvolutionParams {
//!     population_size: 6,
//!     mating_pool_size: 4,
//!     games_per_evaluation: 2,
//!     ..EvolutionParams::default()
//! };
//! let mut engine = EvolutionEngine::random(&[15, 8, 6], 0.5, params, rand_pcg::Pcg32::seed_from_u64(1)).unwrap();
//! let summaries = engine.run(2).unwrap();
//! assert_eq!(summaries.len(), 2);
//! assert_eq!(engine.population().len(), 6);
//! ```

use std::{panic, thread};

use mancala_evaluator::{EvaluationError, fitness::Evaluator};
use mancala_nn::{Network, NetworkError};
use rand::{Rng, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    ConfigurationError, EvolutionError,
    operators::{uniform_reset_mutation, whole_arithmetic_recombination},
    params::{EvolutionParams, check_probability},
    statistics::FitnessSummary,
};

/// A non-empty set of networks sharing one architecture.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    members: Vec<Network>,
}

impl Population {
    /// Creates `size` networks with normally distributed weights.
    pub fn random<R>(
        layer_sizes: &[usize],
        learning_rate: f64,
        size: usize,
        rng: &mut R,
    ) -> Result<Self, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let members = (0..size)
            .map(|_| Network::random(layer_sizes, learning_rate, rng))
            .collect::<Result<Vec<_>, NetworkError>>()?;
        Ok(Self::from_members(members)?)
    }

    pub fn from_members(members: Vec<Network>) -> Result<Self, ConfigurationError> {
        let Some(first) = members.first() else {
            return Err(ConfigurationError::ZeroSize {
                name: "population size",
            });
        };
        if let Some(other) = members.iter().find(|m| !m.has_same_architecture(first)) {
            return Err(ConfigurationError::ArchitectureMismatch {
                left: first.layer_sizes().to_vec(),
                right: other.layer_sizes().to_vec(),
            });
        }
        Ok(Self { members })
    }

    #[must_use]
    pub fn members(&self) -> &[Network] {
        &self.members
    }

    #[must_use]
    pub fn into_members(self) -> Vec<Network> {
        self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn layer_sizes(&self) -> &[usize] {
        // non-empty by construction
        self.members[0].layer_sizes()
    }
}

/// Fitness scores indexed by member slot.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessRecord {
    scores: Vec<f64>,
}

impl FitnessRecord {
    #[must_use]
    pub fn new(scores: Vec<f64>) -> Self {
        Self { scores }
    }

    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    #[must_use]
    pub fn get(&self, slot: usize) -> Option<f64> {
        self.scores.get(slot).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Slots ordered from the fittest down; equal scores keep slot order.
    #[must_use]
    pub fn ranked(&self) -> Vec<usize> {
        let mut slots = (0..self.scores.len()).collect::<Vec<_>>();
        slots.sort_by(|&a, &b| self.scores[b].total_cmp(&self.scores[a]));
        slots
    }

    /// The `n` fittest slots with their scores, fittest first.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<(usize, f64)> {
        self.ranked()
            .into_iter()
            .take(n)
            .map(|slot| (slot, self.scores[slot]))
            .collect()
    }

    #[must_use]
    pub fn best(&self) -> Option<(usize, f64)> {
        self.top(1).first().copied()
    }

    #[must_use]
    pub fn summary(&self) -> Option<FitnessSummary> {
        FitnessSummary::from_scores(self.scores.iter().copied())
    }
}

/// Scores every member against a random opponent, one thread per member.
///
/// The opponent of each member is seeded by a value drawn from `rng` in slot
/// order before any game starts.
pub fn compute_fitness<R>(
    evaluator: &Evaluator,
    members: &[Network],
    rng: &mut R,
) -> Result<FitnessRecord, EvaluationError>
where
    R: Rng + ?Sized,
{
    let seeds = members.iter().map(|_| rng.random::<u64>()).collect::<Vec<_>>();
    let scores = thread::scope(|s| {
        let handles = members
            .iter()
            .zip(seeds)
            .map(|(network, seed)| {
                s.spawn(move || evaluator.fitness(network, &mut Pcg32::seed_from_u64(seed)))
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect::<Result<Vec<_>, _>>()
    })?;
    Ok(FitnessRecord::new(scores))
}

/// Fills a mating pool of `mating_pool_size` parents by repeated tournaments.
///
/// Each tournament draws `tournament_size` distinct members; its winner is
/// accepted with probability `p_best`.
pub fn tournament_select<'a, R>(
    members: &'a [Network],
    fitness: &FitnessRecord,
    tournament_size: usize,
    mating_pool_size: usize,
    p_best: f64,
    rng: &mut R,
) -> Result<Vec<&'a Network>, ConfigurationError>
where
    R: Rng + ?Sized,
{
    if tournament_size == 0 {
        return Err(ConfigurationError::ZeroSize {
            name: "tournament size",
        });
    }
    if tournament_size >= members.len() {
        return Err(ConfigurationError::TournamentTooLarge {
            tournament_size,
            population_size: members.len(),
        });
    }
    if fitness.len() != members.len() {
        return Err(ConfigurationError::FitnessRecordMismatch {
            scores: fitness.len(),
            members: members.len(),
        });
    }
    check_probability("p_best", "(0, 1]", p_best, |p| p > 0.0 && p <= 1.0)?;

    let slots = (0..members.len()).collect::<Vec<_>>();
    let mut pool = Vec::with_capacity(mating_pool_size);
    while pool.len() < mating_pool_size {
        let winner = slots
            .choose_multiple(rng, tournament_size)
            .copied()
            .max_by(|&a, &b| fitness.scores[a].total_cmp(&fitness.scores[b]));
        if let Some(winner) = winner.filter(|_| rng.random_bool(p_best)) {
            pool.push(&members[winner]);
        }
    }
    Ok(pool)
}

/// Builds `child_pool_size` children from random pairs of the mating pool,
/// then mutates every child.
///
/// Both parents are drawn uniformly with replacement, so a parent may be
/// paired with itself.
pub fn recombine<R>(
    mating_pool: &[&Network],
    child_pool_size: usize,
    alpha: f64,
    mutation_probability: f64,
    rng: &mut R,
) -> Result<Vec<Network>, ConfigurationError>
where
    R: Rng + ?Sized,
{
    if mating_pool.is_empty() {
        return Err(ConfigurationError::ZeroSize {
            name: "mating pool size",
        });
    }

    let mut children = (0..child_pool_size)
        .map(|_| {
            let a = mating_pool[rng.random_range(0..mating_pool.len())];
            let b = mating_pool[rng.random_range(0..mating_pool.len())];
            whole_arithmetic_recombination(a, b, alpha)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut mutated = 0;
    for child in &mut children {
        mutated += uniform_reset_mutation(child, mutation_probability, rng)?;
    }
    tracing::trace!(children = children.len(), mutated, "child pool built");
    Ok(children)
}

/// Scores the children and keeps the `target_size` fittest of them.
///
/// Returns the survivors fittest first, together with their scores.
pub fn survival_select<R>(
    evaluator: &Evaluator,
    children: Vec<Network>,
    target_size: usize,
    rng: &mut R,
) -> Result<(Population, FitnessRecord), EvolutionError>
where
    R: Rng + ?Sized,
{
    if target_size == 0 {
        return Err(ConfigurationError::ZeroSize {
            name: "population size",
        }
        .into());
    }
    if children.len() <= target_size {
        return Err(ConfigurationError::NotEnoughChildren {
            children: children.len(),
            target_size,
        }
        .into());
    }

    let fitness = compute_fitness(evaluator, &children, rng)?;
    let mut slots = children.into_iter().map(Some).collect::<Vec<_>>();
    let (survivors, scores): (Vec<_>, Vec<_>) = fitness
        .top(target_size)
        .into_iter()
        .filter_map(|(slot, score)| slots[slot].take().map(|child| (child, score)))
        .unzip();
    Ok((Population::from_members(survivors)?, FitnessRecord::new(scores)))
}

/// Statistics of one completed generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub generation: usize,
    /// Fitness of the population the generation started from
    pub parents: FitnessSummary,
    /// Fitness of the children that survived into the next population
    pub survivors: FitnessSummary,
}

/// Drives generational evolution of a population.
#[derive(Debug, Clone)]
pub struct EvolutionEngine<R = Pcg32> {
    params: EvolutionParams,
    evaluator: Evaluator,
    population: Population,
    generation: usize,
    rng: R,
}

impl<R> EvolutionEngine<R>
where
    R: Rng,
{
    /// Takes ownership of `population`, whose size must match the parameters.
    pub fn new(population: Population, params: EvolutionParams, rng: R) -> Result<Self, EvolutionError> {
        params.validate()?;
        if population.len() != params.population_size {
            return Err(ConfigurationError::PopulationSizeMismatch {
                expected: params.population_size,
                actual: population.len(),
            }
            .into());
        }
        Ok(Self {
            evaluator: params.evaluator(),
            params,
            population,
            generation: 0,
            rng,
        })
    }

    /// Starts from a random population of `params.population_size` networks.
    pub fn random(
        layer_sizes: &[usize],
        learning_rate: f64,
        params: EvolutionParams,
        mut rng: R,
    ) -> Result<Self, EvolutionError> {
        params.validate()?;
        let population = Population::random(layer_sizes, learning_rate, params.population_size, &mut rng)?;
        Self::new(population, params, rng)
    }

    #[must_use]
    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn into_population(self) -> Population {
        self.population
    }

    /// Generations completed so far.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Scores the current population.
    pub fn evaluate(&mut self) -> Result<FitnessRecord, EvolutionError> {
        Ok(compute_fitness(&self.evaluator, self.population.members(), &mut self.rng)?)
    }

    /// Advances the population by one generation.
    pub fn step(&mut self) -> Result<GenerationSummary, EvolutionError> {
        let params = &self.params;
        let fitness = compute_fitness(&self.evaluator, self.population.members(), &mut self.rng)?;
        let mating_pool = tournament_select(
            self.population.members(),
            &fitness,
            params.tournament_size,
            params.mating_pool_size,
            params.p_best,
            &mut self.rng,
        )?;
        let children = recombine(
            &mating_pool,
            params.child_pool_size(),
            params.recombination_alpha,
            params.mutation_probability,
            &mut self.rng,
        )?;
        let (next, survivor_fitness) =
            survival_select(&self.evaluator, children, params.population_size, &mut self.rng)?;

        let summary = GenerationSummary {
            generation: self.generation,
            parents: fitness.summary().unwrap_or_default(),
            survivors: survivor_fitness.summary().unwrap_or_default(),
        };
        tracing::info!(
            generation = summary.generation,
            parent_mean = summary.parents.mean,
            parent_max = summary.parents.max,
            survivor_mean = summary.survivors.mean,
            survivor_max = summary.survivors.max,
            "generation complete"
        );
        self.population = next;
        self.generation += 1;
        Ok(summary)
    }

    /// Runs `generations` generational steps.
    pub fn run(&mut self, generations: usize) -> Result<Vec<GenerationSummary>, EvolutionError> {
        (0..generations).map(|_| self.step()).collect()
    }

    /// Scores the current population and returns its `n` fittest members, fittest first.
    pub fn best(&mut self, n: usize) -> Result<Vec<(&Network, f64)>, EvolutionError> {
        let fitness = self.evaluate()?;
        Ok(fitness
            .top(n)
            .into_iter()
            .map(|(slot, score)| (&self.population.members()[slot], score))
            .collect())
    }
}
