use mancala_evaluator::{
    fitness::{Evaluator, MatchSummary, Seating},
    policy::RandomPolicy,
};
use mancala_nn::Network;
use mancala_training::reinforce::{DISCOUNT_RATE, OnlineTrainer};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

const LAYERS: [usize; 3] = [15, 200, 6];
const LEARNING_RATE: f64 = 0.3;
const TRAINING_GAMES: usize = 1000;
const TEST_GAMES: usize = 1000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Layer sizes of the network, input layer first
    #[arg(long, value_delimiter = ',', default_values_t = LAYERS)]
    layers: Vec<usize>,
    #[arg(long, default_value_t = LEARNING_RATE)]
    learning_rate: f64,
    /// Number of training games
    #[arg(long, default_value_t = TRAINING_GAMES)]
    games: usize,
    /// Number of games played before and after training to measure the win rate
    #[arg(long, default_value_t = TEST_GAMES)]
    test_games: usize,
    /// Discount rate applied to move rewards
    #[arg(long, default_value_t = DISCOUNT_RATE)]
    discount_rate: f64,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        layers,
        learning_rate,
        games,
        test_games,
        discount_rate,
        seed,
    } = arg;
    let mut rng = Pcg32::seed_from_u64(super::resolve_seed(*seed));
    let evaluator = Evaluator::new(*test_games, Seating::Alternate);

    let network = Network::random(layers, *learning_rate, &mut rng)?;
    let before = evaluator.play(&network, &mut RandomPolicy::new(&mut rng))?;
    report_match("Before training", &before);

    let mut trainer = OnlineTrainer::new(network)?.with_discount_rate(*discount_rate);
    let summary = trainer.train(*games, &mut rng)?;
    eprintln!(
        "Training: won {} of {} games ({:.3})",
        summary.wins,
        summary.games,
        summary.win_rate()
    );

    let after = evaluator.play(trainer.network(), &mut RandomPolicy::new(&mut rng))?;
    report_match("After training", &after);
    Ok(())
}

fn report_match(label: &str, summary: &MatchSummary) {
    eprintln!("{label}:");
    eprintln!("  Games:    {}", summary.games);
    eprintln!("  Wins:     {}", summary.wins);
    eprintln!("  Draws:    {}", summary.draws);
    eprintln!("  Losses:   {}", summary.losses);
    eprintln!("  Win Rate: {:.3}", summary.win_rate());
}
