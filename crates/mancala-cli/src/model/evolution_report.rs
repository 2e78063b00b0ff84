use chrono::{DateTime, Utc};
use mancala_training::{genetic::GenerationSummary, params::EvolutionParams};
use serde::Serialize;

/// Record of one `evolve` run.
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionReport {
    pub trained_at: DateTime<Utc>,
    pub seed: u64,
    pub layer_sizes: Vec<usize>,
    pub learning_rate: f64,
    pub params: EvolutionParams,
    pub generations: Vec<GenerationSummary>,
    /// Fitness of the best members of the final population, fittest first
    pub final_best_fitness: Vec<f64>,
}
