use serde::{Deserialize, Serialize};

/// One of the two seats at the board.
///
/// Player 0 always moves first. Seats serialize as their index (`0` or `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    #[default]
    #[display("player 0")]
    Zero,
    #[display("player 1")]
    One,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid player index {index}, must be 0 or 1")]
pub struct InvalidPlayerError {
    index: u8,
}

impl Player {
    pub const ALL: [Self; 2] = [Self::Zero, Self::One];

    /// Returns `0` for [`Player::Zero`] and `1` for [`Player::One`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = InvalidPlayerError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            _ => Err(InvalidPlayerError { index }),
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        match player {
            Player::Zero => 0,
            Player::One => 1,
        }
    }
}
