use super::{Pit, Player};

/// Number of cells on the board: two stores and two rows of six pits.
pub const CELL_COUNT: usize = 14;

/// A snapshot of every board cell.
///
/// Cell order is fixed: store of player 0 at index 0, player 0's pits at
/// `1..=6`, player 1's pits at `7..=12`, store of player 1 at index 13.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation([u8; CELL_COUNT]);

impl Observation {
    #[must_use]
    pub const fn new(cells: [u8; CELL_COUNT]) -> Self {
        Self(cells)
    }

    #[must_use]
    pub fn cells(&self) -> &[u8; CELL_COUNT] {
        &self.0
    }

    /// Board cell holding `player`'s `pit`.
    #[must_use]
    pub const fn cell_index(player: Player, pit: Pit) -> usize {
        player.index() * Pit::COUNT + pit.number() as usize
    }

    /// Board cell holding `player`'s store.
    #[must_use]
    pub const fn store_index(player: Player) -> usize {
        match player {
            Player::Zero => 0,
            Player::One => CELL_COUNT - 1,
        }
    }

    #[must_use]
    pub fn store(&self, player: Player) -> u8 {
        self.0[Self::store_index(player)]
    }

    /// The six pits of `player`, in pit order.
    #[must_use]
    pub fn row(&self, player: Player) -> &[u8] {
        let start = Self::cell_index(player, Pit::ALL[0]);
        &self.0[start..start + Pit::COUNT]
    }

    #[must_use]
    pub fn marbles(&self, player: Player, pit: Pit) -> u8 {
        self.0[Self::cell_index(player, pit)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_layout() {
        let cells: [u8; CELL_COUNT] = std::array::from_fn(|i| u8::try_from(i).unwrap());
        let observation = Observation::new(cells);
        assert_eq!(observation.store(Player::Zero), 0);
        assert_eq!(observation.store(Player::One), 13);
        assert_eq!(observation.row(Player::Zero), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(observation.row(Player::One), &[7, 8, 9, 10, 11, 12]);
        assert_eq!(observation.marbles(Player::One, Pit::ALL[0]), 7);
    }
}
