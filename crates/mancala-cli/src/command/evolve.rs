use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use mancala_evaluator::fitness::Seating;
use mancala_nn::DEFAULT_LEARNING_RATE;
use mancala_training::{
    genetic::{EvolutionEngine, GenerationSummary},
    params::EvolutionParams,
};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::{model::evolution_report::EvolutionReport, util};

const LAYERS: [usize; 3] = [15, 100, 6];
const GENERATIONS: usize = 10;
const BEST_COUNT: usize = 5;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    /// Layer sizes of every network, input layer first
    #[arg(long, value_delimiter = ',', default_values_t = LAYERS)]
    layers: Vec<usize>,
    /// Learning rate given to every network
    #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
    learning_rate: f64,
    /// Number of generations to run
    #[arg(long, default_value_t = GENERATIONS)]
    generations: usize,
    /// JSON file with evolution parameters; the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    population_size: Option<usize>,
    #[arg(long)]
    tournament_size: Option<usize>,
    #[arg(long)]
    mating_pool_size: Option<usize>,
    #[arg(long)]
    p_best: Option<f64>,
    #[arg(long)]
    mutation_probability: Option<f64>,
    /// Games played to score one network
    #[arg(long)]
    games: Option<usize>,
    /// Seat of the network during evaluation (fixed-0, fixed-1 or alternate)
    #[arg(long)]
    seating: Option<Seating>,
    /// Number of best networks to report before and after evolution
    #[arg(long, default_value_t = BEST_COUNT)]
    best: usize,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the evolution report
    #[arg(long)]
    output: Option<PathBuf>,
}

impl EvolveArg {
    fn params(&self) -> anyhow::Result<EvolutionParams> {
        let mut params = match &self.config {
            Some(path) => util::read_json_file("evolution config", path)?,
            None => EvolutionParams::default(),
        };
        if let Some(value) = self.population_size {
            params.population_size = value;
        }
        if let Some(value) = self.tournament_size {
            params.tournament_size = value;
        }
        if let Some(value) = self.mating_pool_size {
            params.mating_pool_size = value;
        }
        if let Some(value) = self.p_best {
            params.p_best = value;
        }
        if let Some(value) = self.mutation_probability {
            params.mutation_probability = value;
        }
        if let Some(value) = self.games {
            params.games_per_evaluation = value;
        }
        if let Some(value) = self.seating {
            params.seating = value;
        }
        params.validate().context("Invalid evolution parameters")?;
        Ok(params)
    }
}

pub(crate) fn run(arg: &EvolveArg) -> anyhow::Result<()> {
    let params = arg.params()?;
    let seed = super::resolve_seed(arg.seed);
    let mut engine = EvolutionEngine::random(
        &arg.layers,
        arg.learning_rate,
        params.clone(),
        Pcg32::seed_from_u64(seed),
    )?;

    eprintln!("Initial population:");
    report_best(&mut engine, arg.best)?;

    let mut generations = Vec::with_capacity(arg.generations);
    for _ in 0..arg.generations {
        let summary = engine.step()?;
        report_generation(&summary);
        generations.push(summary);
    }

    eprintln!("Final population:");
    let final_best_fitness = report_best(&mut engine, arg.best)?;
    eprintln!("Evolution completed.");

    let report = EvolutionReport {
        trained_at: Utc::now(),
        seed,
        layer_sizes: arg.layers.clone(),
        learning_rate: arg.learning_rate,
        params,
        generations,
        final_best_fitness,
    };
    util::save_json(&report, arg.output.as_deref())?;
    Ok(())
}

fn report_best(engine: &mut EvolutionEngine, count: usize) -> anyhow::Result<Vec<f64>> {
    let best = engine.best(count)?;
    eprintln!("  Best Networks:");
    for (rank, (_, fitness)) in best.iter().enumerate() {
        eprintln!("  {rank:2}: {fitness:.3}");
    }
    Ok(best.into_iter().map(|(_, fitness)| fitness).collect())
}

fn report_generation(summary: &GenerationSummary) {
    let GenerationSummary {
        generation,
        parents,
        survivors,
    } = summary;
    eprintln!("Generation #{generation}:");
    eprintln!("  Parent Fitness:");
    eprintln!("    Min:  {:.3}", parents.min);
    eprintln!("    Max:  {:.3}", parents.max);
    eprintln!("    Mean: {:.3}", parents.mean);
    eprintln!("  Survivor Fitness:");
    eprintln!("    Min:  {:.3}", survivors.min);
    eprintln!("    Max:  {:.3}", survivors.max);
    eprintln!("    Mean: {:.3}", survivors.mean);
}
