use std::cmp::Ordering;

use crate::Player;

/// Final totals of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    totals: [u32; 2],
}

impl Score {
    #[must_use]
    pub const fn new(player0: u32, player1: u32) -> Self {
        Self {
            totals: [player0, player1],
        }
    }

    #[must_use]
    pub const fn total(&self, player: Player) -> u32 {
        self.totals[player.index()]
    }

    /// Returns the player with the strictly higher total.
    ///
    /// Equal totals are a draw and return `None`: neither seat is credited
    /// with a win.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        match self.totals[0].cmp(&self.totals[1]) {
            Ordering::Greater => Some(Player::Zero),
            Ordering::Less => Some(Player::One),
            Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_by_total() {
        assert_eq!(Score::new(30, 18).winner(), Some(Player::Zero));
        assert_eq!(Score::new(10, 38).winner(), Some(Player::One));
    }

    #[test]
    fn test_equal_totals_are_draw() {
        assert_eq!(Score::new(24, 24).winner(), None);
    }
}
