use std::fmt;

/// A pit number on the moving player's own row, `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pit(u8);

impl Pit {
    pub const COUNT: usize = 6;

    /// Every pit, in ascending order.
    pub const ALL: [Self; Self::COUNT] = [Self(1), Self(2), Self(3), Self(4), Self(5), Self(6)];

    /// Returns `None` unless `number` is within `1..=6`.
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number <= 6 {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Builds a pit from a zero-based position, e.g. a network output index.
    #[must_use]
    pub fn from_offset(offset: usize) -> Option<Self> {
        Self::ALL.get(offset).copied()
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based position of this pit (`number - 1`).
    #[must_use]
    pub const fn offset(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for Pit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pit {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_checked() {
        assert!(Pit::new(0).is_none());
        assert!(Pit::new(7).is_none());
        assert_eq!(Pit::new(1).map(Pit::offset), Some(0));
        assert_eq!(Pit::new(6).map(Pit::offset), Some(5));
    }

    #[test]
    fn test_offset_roundtrip() {
        for pit in Pit::ALL {
            assert_eq!(Pit::from_offset(pit.offset()), Some(pit));
        }
        assert!(Pit::from_offset(6).is_none());
    }
}
