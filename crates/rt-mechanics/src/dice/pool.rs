//! Dice pools and the results of rolling them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DiceSource, Die};

/// One die and the face it landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// Die type.
    pub die: Die,
    /// Face value, 1 to `die.sides()`.
    pub value: u32,
}

/// Every die from one roll, in the order rolled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// The dice.
    pub dice: Vec<DieResult>,
}

impl RollResult {
    /// Sum of face values.
    pub fn total(&self) -> u32 {
        self.dice.iter().map(|d| d.value).sum()
    }

    /// Number of dice rolled.
    pub fn count(&self) -> usize {
        self.dice.len()
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        write!(f, "[{}] = {}", faces.join(", "), self.total())
    }
}

/// A collection of dice to be rolled together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DicePool {
    /// The dice in this pool.
    pub dice: Vec<Die>,
}

impl DicePool {
    /// Create an empty dice pool.
    pub fn new() -> Self {
        Self { dice: Vec::new() }
    }

    /// Add `count` dice of the given type.
    pub fn add(mut self, die: Die, count: u32) -> Self {
        for _ in 0..count {
            self.dice.push(die);
        }
        self
    }

    /// Returns how many dice are in the pool.
    pub fn count(&self) -> usize {
        self.dice.len()
    }

    /// Returns true if the pool has no dice.
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// Roll all dice in the pool using the given source.
    pub fn roll(&self, source: &dyn DiceSource) -> RollResult {
        let dice = self
            .dice
            .iter()
            .map(|die| DieResult {
                die: *die,
                value: source.roll(die.sides()),
            })
            .collect();
        RollResult { dice }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{RngSource, ScriptedDice};

    #[test]
    fn empty_pool() {
        let pool = DicePool::new();
        assert_eq!(pool.count(), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn add_dice() {
        let pool = DicePool::new().add(Die::D10, 2).add(Die::D5, 3);
        assert_eq!(pool.count(), 5);
        assert!(!pool.is_empty());
    }

    #[test]
    fn roll_produces_valid_values() {
        let source = RngSource::seeded(42);
        let pool = DicePool::new().add(Die::D5, 10);
        let result = pool.roll(&source);
        assert_eq!(result.dice.len(), 10);
        for die_result in &result.dice {
            assert!((1..=5).contains(&die_result.value));
        }
    }

    #[test]
    fn roll_uses_source_in_order() {
        let source = ScriptedDice::new([3, 9]);
        let result = DicePool::new().add(Die::D10, 2).roll(&source);
        assert_eq!(result.total(), 12);
        assert_eq!(result.count(), 2);
        assert_eq!(result.dice[0].value, 3);
        assert_eq!(result.to_string(), "[3, 9] = 12");
    }

    #[test]
    fn empty_roll() {
        let result = DicePool::new().roll(&ScriptedDice::new([5]));
        assert_eq!(result.total(), 0);
        assert_eq!(result.to_string(), "[] = 0");
    }
}
