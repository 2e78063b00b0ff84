//! Online reward-weighted training against a random opponent.
//!
//! A single network plays complete games against [`RandomPolicy`], taking
//! seat 0 in even games and seat 1 in odd ones. Every move the network makes
//! is recorded together with a training target and a reward:
//!
//! - If the move increased the network's store, the target is the network's
//!   own output with the chosen pit raised to [`REWARDED_TARGET`], and the
//!   reward is half the number of marbles gained.
//! - Otherwise the chosen pit is lowered to [`PENALIZED_TARGET`] and the reward
//!   is [`MISSED_REWARD`].
//!
//! After the game, rewards of a won game are multiplied by [`WIN_BONUS`], then
//! discounted and normalized by [`discount_rewards`]. The network is trained on
//! each recorded move in order, with the target scaled by its discounted reward.
//!
//! ```
//! use mancala_nn::Network;
//! use mancala_training::reinforce::OnlineTrainer;
//! use rand::SeedableRng as _;
//!
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(3);
//! let network = Network::with_default_learning_rate(&[15, 12, 6], &mut rng).unwrap();
//! let mut trainer = OnlineTrainer::new(network).unwrap();
//! let summary = trainer.train(4, &mut rng).unwrap();
//! assert_eq!(summary.games, 4);
//! ```

use mancala_engine::{Board, Environment as _, MoveOutcome, Pit, Player};
use mancala_evaluator::{
    EvaluationError,
    fitness::Seating,
    policy::{MovePolicy as _, NetworkPolicy, RandomPolicy, apply_first_legal, network_input, rank_pits},
};
use mancala_nn::Network;
use rand::Rng;

/// Target activation of a pit whose move gained marbles.
pub const REWARDED_TARGET: f64 = 0.99;
/// Target activation of a pit whose move gained nothing.
pub const PENALIZED_TARGET: f64 = 0.01;
/// Reward per marble gained by a move.
pub const GAIN_REWARD: f64 = 0.5;
/// Reward of a move that gained nothing.
pub const MISSED_REWARD: f64 = -1.0;
/// Multiplier applied to every reward of a won game.
pub const WIN_BONUS: f64 = 1.5;
pub const DISCOUNT_RATE: f64 = 0.2;

/// Accumulates `rewards` backwards with `discount_rate`, then normalizes them.
///
/// Element `t` becomes `r[t] + rate·r[t+1] + rate²·r[t+2] + ...`. The result is
/// divided by its standard deviation (skipped when that is zero) and then
/// shifted to zero mean.
///
/// ```
/// use mancala_training::reinforce::discount_rewards;
///
/// let discounted = discount_rewards(&[1.0, 0.0, 2.0], 0.5);
/// // before normalization: [1.5, 1.0, 2.0]
/// assert!(discounted[0].abs() < 1e-12);
/// assert!(discounted[1] < 0.0 && discounted[2] > 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn discount_rewards(rewards: &[f64], discount_rate: f64) -> Vec<f64> {
    let mut discounted = vec![0.0; rewards.len()];
    let mut running = 0.0;
    for (slot, reward) in discounted.iter_mut().zip(rewards).rev() {
        running = reward + running * discount_rate;
        *slot = running;
    }
    if discounted.is_empty() {
        return discounted;
    }

    let n = discounted.len() as f64;
    let mean = discounted.iter().sum::<f64>() / n;
    let std_dev = (discounted.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std_dev > 0.0 {
        for d in &mut discounted {
            *d /= std_dev;
        }
    }
    let mean = discounted.iter().sum::<f64>() / n;
    for d in &mut discounted {
        *d -= mean;
    }
    discounted
}

/// Training target and reward of a move on `pit` that added `gained` marbles
/// to the mover's store.
///
/// The target is `output` with the played pit's entry replaced by
/// [`REWARDED_TARGET`] or [`PENALIZED_TARGET`].
///
/// ```
/// use mancala_engine::Pit;
/// use mancala_training::reinforce::move_feedback;
///
/// let (target, reward) = move_feedback(vec![0.5; 6], Pit::new(2).unwrap(), 3);
/// assert_eq!(target, [0.5, 0.99, 0.5, 0.5, 0.5, 0.5]);
/// assert_eq!(reward, 1.5);
/// ```
#[must_use]
pub fn move_feedback(mut output: Vec<f64>, pit: Pit, gained: u8) -> (Vec<f64>, f64) {
    let (entry, reward) = if gained > 0 {
        (REWARDED_TARGET, GAIN_REWARD * f64::from(gained))
    } else {
        (PENALIZED_TARGET, MISSED_REWARD)
    };
    if let Some(slot) = output.get_mut(pit.offset()) {
        *slot = entry;
    }
    (output, reward)
}

/// Multiplies every reward of a won game by [`WIN_BONUS`].
pub fn apply_win_bonus(rewards: &mut [f64], won: bool) {
    if won {
        for reward in rewards {
            *reward *= WIN_BONUS;
        }
    }
}

/// Results of an online training run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainingSummary {
    pub games: usize,
    pub wins: usize,
}

impl TrainingSummary {
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

#[derive(Debug, Default)]
struct Episode {
    inputs: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
    rewards: Vec<f64>,
}

/// Trains one network by playing it against a random opponent.
#[derive(Debug, Clone)]
pub struct OnlineTrainer {
    network: Network,
    discount_rate: f64,
}

impl OnlineTrainer {
    /// Wraps a network mapping 15 inputs to 6 outputs.
    pub fn new(network: Network) -> Result<Self, EvaluationError> {
        NetworkPolicy::new(&network)?;
        Ok(Self {
            network,
            discount_rate: DISCOUNT_RATE,
        })
    }

    #[must_use]
    pub fn with_discount_rate(mut self, discount_rate: f64) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    #[must_use]
    pub fn into_network(self) -> Network {
        self.network
    }

    /// Plays and learns from `games` games, alternating the network's seat.
    pub fn train<R>(&mut self, games: usize, rng: &mut R) -> Result<TrainingSummary, EvaluationError>
    where
        R: Rng + ?Sized,
    {
        let report_every = (games / 10).max(1);
        let mut summary = TrainingSummary::default();
        for game in 0..games {
            let seat = Seating::Alternate.seat_for_game(game);
            if self.train_game(seat, rng)? {
                summary.wins += 1;
            }
            summary.games += 1;
            if summary.games % report_every == 0 {
                tracing::info!(
                    games = summary.games,
                    wins = summary.wins,
                    win_rate = summary.win_rate(),
                    "training progress"
                );
            }
        }
        Ok(summary)
    }

    /// Plays one game from `seat`, trains on it, and reports whether the network won.
    fn train_game<R>(&mut self, seat: Player, rng: &mut R) -> Result<bool, EvaluationError>
    where
        R: Rng + ?Sized,
    {
        let mut board = Board::new();
        let mut opponent = RandomPolicy::new(&mut *rng);
        let mut episode = Episode::default();
        let mut player = Player::Zero;
        loop {
            let outcome = if player == seat {
                self.play_recorded(&mut board, seat, &mut episode)?
            } else {
                opponent.play_turn(&mut board, player)?.outcome
            };
            match outcome {
                MoveOutcome::Continue(next) => player = next,
                MoveOutcome::Terminal => break,
                MoveOutcome::Invalid => {}
            }
        }

        let won = board.final_score().winner() == Some(seat);
        apply_win_bonus(&mut episode.rewards, won);
        let discounted = discount_rewards(&episode.rewards, self.discount_rate);
        for ((input, target), reward) in episode.inputs.iter().zip(&episode.targets).zip(discounted) {
            let scaled = target.iter().map(|t| t * reward).collect::<Vec<_>>();
            self.network.train(input, &scaled)?;
        }
        tracing::debug!(?seat, won, moves = episode.rewards.len(), "training game finished");
        Ok(won)
    }

    fn play_recorded(
        &self,
        board: &mut Board,
        seat: Player,
        episode: &mut Episode,
    ) -> Result<MoveOutcome, EvaluationError> {
        let observation = board.observe();
        let input = network_input(&observation, seat);
        let output = self.network.infer(&input)?;
        let played =
            apply_first_legal(&mut *board, seat, rank_pits(&output)).ok_or(EvaluationError::NoLegalMove { seat })?;

        let gained = board.observe().store(seat).saturating_sub(observation.store(seat));
        let (target, reward) = move_feedback(output, played.pit, gained);
        episode.inputs.push(input);
        episode.targets.push(target);
        episode.rewards.push(reward);
        Ok(played.outcome)
    }
}
