use clap::{Parser, Subcommand};

use self::{evolve::EvolveArg, train::TrainArg};

mod evolve;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train a network online against a random opponent
    Train(#[clap(flatten)] TrainArg),
    /// Evolve a population of networks with a genetic algorithm
    Evolve(#[clap(flatten)] EvolveArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evolve(arg) => evolve::run(&arg)?,
    }
    Ok(())
}

/// Uses the given seed, or draws a fresh one so the run can be repeated.
fn resolve_seed(seed: Option<u64>) -> u64 {
    use rand::Rng as _;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(seed, "random generator seeded");
    seed
}
