use crate::{
    Environment,
    core::{CELL_COUNT, Observation, Pit, Player},
};

use super::Score;

const INITIAL_MARBLES: u8 = 4;

/// Result of applying a move to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// The game goes on and the given player moves next.
    Continue(Player),
    /// The chosen pit was empty; nothing changed and the same player must choose again.
    Invalid,
    /// One row is empty and the game is over.
    Terminal,
}

/// A Mancala board with two rows of six pits and one store per player.
///
/// # Sowing
///
/// Marbles are lifted from the chosen pit and dropped one by one along the
/// mover's path. Player 0 sows from its pit towards its store (cell 0), then
/// along player 1's row; player 1 sows along its own row into its store
/// (cell 13), then along player 0's row. Each player skips the opponent's store.
///
/// # Extra turns and captures
///
/// - If the last marble lands in the mover's store, the mover plays again.
/// - If the last marble lands in an empty pit on either row and the pit
///   across from it holds marbles, both pits are emptied into the mover's store.
///
/// # Example
///
/// ```
/// use mancala_engine::{Board, Environment, MoveOutcome, Pit, Player};
///
/// let mut board = Board::new();
/// let outcome = board.apply_move(Player::Zero, Pit::new(1).unwrap());
/// assert_eq!(outcome, MoveOutcome::Continue(Player::One));
/// assert_eq!(board.observe().store(Player::Zero), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [u8; CELL_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board with four marbles in every pit and empty stores.
    #[must_use]
    pub fn new() -> Self {
        let mut cells = [INITIAL_MARBLES; CELL_COUNT];
        for player in Player::ALL {
            cells[Observation::store_index(player)] = 0;
        }
        Self { cells }
    }

    /// Creates a board from raw cells laid out as in [`Observation`].
    #[must_use]
    pub const fn from_cells(cells: [u8; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Next cell along `player`'s sowing path.
    fn next_index(index: usize, player: Player) -> usize {
        let store0 = Observation::store_index(Player::Zero);
        let store1 = Observation::store_index(Player::One);
        match index {
            i if i == store0 => store1 - 6,
            i if i == store1 => store1 - 7,
            1..=6 => {
                let next = index - 1;
                if next == store0 && player == Player::One {
                    store1 - 6
                } else {
                    next
                }
            }
            _ => {
                let next = index + 1;
                if next == store1 && player == Player::Zero {
                    store1 - 7
                } else {
                    next
                }
            }
        }
    }

    /// Cell on the other row facing `index`.
    fn across(index: usize) -> usize {
        if index > Pit::COUNT {
            index - Pit::COUNT
        } else {
            index + Pit::COUNT
        }
    }

    fn row_sum(&self, player: Player) -> u32 {
        self.observe().row(player).iter().copied().map(u32::from).sum()
    }

    fn row_is_empty(&self, player: Player) -> bool {
        self.observe().row(player).iter().all(|&m| m == 0)
    }
}

impl Environment for Board {
    fn apply_move(&mut self, player: Player, pit: Pit) -> MoveOutcome {
        if self.is_terminal() {
            return MoveOutcome::Terminal;
        }

        let mut index = Observation::cell_index(player, pit);
        let mut marbles = self.cells[index];
        if marbles == 0 {
            return MoveOutcome::Invalid;
        }

        self.cells[index] = 0;
        while marbles > 0 {
            index = Self::next_index(index, player);
            self.cells[index] += 1;
            marbles -= 1;
        }

        let store = Observation::store_index(player);
        let next_player = if index == store {
            player
        } else {
            if self.cells[index] == 1 {
                let across = Self::across(index);
                if self.cells[across] != 0 {
                    self.cells[store] += self.cells[across] + self.cells[index];
                    self.cells[across] = 0;
                    self.cells[index] = 0;
                }
            }
            player.opponent()
        };

        if self.is_terminal() {
            MoveOutcome::Terminal
        } else {
            MoveOutcome::Continue(next_player)
        }
    }

    fn observe(&self) -> Observation {
        Observation::new(self.cells)
    }

    fn final_score(&self) -> Score {
        let observation = self.observe();
        let total = |player| u32::from(observation.store(player)) + self.row_sum(player);
        Score::new(total(Player::Zero), total(Player::One))
    }

    fn is_terminal(&self) -> bool {
        Player::ALL.into_iter().any(|player| self.row_is_empty(player))
    }
}
