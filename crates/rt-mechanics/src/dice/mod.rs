//! Dice types, pools, and random sources.
//!
//! Every random draw in the engine goes through a [`DiceSource`], so tests
//! and replays can substitute a scripted sequence for the seeded RNG.

pub mod pool;
pub mod source;

pub use pool::{DicePool, DieResult, RollResult};
pub use source::{DiceSource, RngSource, ScriptedDice};

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Five-sided die (a d10 halved, rounded up).
    D5,
    /// Six-sided die.
    D6,
    /// Ten-sided die.
    D10,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D5 => 5,
            Self::D6 => 6,
            Self::D10 => 10,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// The die with the given number of sides.
    pub fn from_sides(sides: u32) -> MechResult<Self> {
        match sides {
            0 | 1 => Err(MechError::InvalidDie(sides)),
            5 => Ok(Self::D5),
            6 => Ok(Self::D6),
            10 => Ok(Self::D10),
            20 => Ok(Self::D20),
            100 => Ok(Self::D100),
            n => Ok(Self::Custom(n)),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_sides() {
        assert_eq!(Die::D5.sides(), 5);
        assert_eq!(Die::D10.sides(), 10);
        assert_eq!(Die::D100.sides(), 100);
        assert_eq!(Die::Custom(30).sides(), 30);
    }

    #[test]
    fn from_sides() {
        assert_eq!(Die::from_sides(5).unwrap(), Die::D5);
        assert_eq!(Die::from_sides(100).unwrap(), Die::D100);
        assert_eq!(Die::from_sides(3).unwrap(), Die::Custom(3));
        assert!(Die::from_sides(1).is_err());
        assert!(Die::from_sides(0).is_err());
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D10.to_string(), "d10");
        assert_eq!(Die::Custom(30).to_string(), "d30");
    }
}
