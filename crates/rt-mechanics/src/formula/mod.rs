//! Evaluation of the dice formulas found in grant blocks.
//!
//! - **Wounds**: dice arithmetic with characteristic bonus terms, clamped to
//!   zero, e.g. `2xTB+1d5+2`.
//! - **Fate**: a table of d10 ranges, e.g. `(1-5|=2),(6-10|=3)`.
//! - **Plain**: corruption and insanity, e.g. `1d5`, or a bare integer.
//!
//! Content is hand-written, so the functions here never fail: malformed
//! formulas are logged and degrade to a fallback value. A roll the player
//! already confirmed is passed in as `stored` and always wins.

pub mod expr;
pub mod fate;

pub use expr::{DiceExpr, Evaluation, Term};
pub use fate::{FateRange, FateTable};

use rt_core::Actor;

use crate::dice::DiceSource;
use crate::error::MechError;

/// Evaluate a wounds formula against an actor's characteristic bonuses.
///
/// The result is clamped to a minimum of 0. Unparseable formulas are
/// logged and yield 0.
pub fn evaluate_wounds(formula: &str, actor: &Actor, dice: &dyn DiceSource) -> i32 {
    let evaluated =
        DiceExpr::parse(formula).and_then(|expr| expr.evaluate(dice, |key| actor.bonus(key)));
    match evaluated {
        Ok(evaluation) => evaluation.total.max(0),
        Err(e) => {
            tracing::warn!(formula, error = %e, "unusable wounds formula, using 0");
            0
        }
    }
}

/// Evaluate a fate table with one d10 draw.
///
/// When no row matches, the first row's value is used and a warning is
/// logged. An unparseable table yields 0.
pub fn evaluate_fate(formula: &str, dice: &dyn DiceSource) -> i32 {
    let table = match FateTable::parse(formula) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(formula, error = %e, "unparseable fate formula, using 0");
            return 0;
        }
    };
    let roll = dice.d10();
    table.lookup(roll).unwrap_or_else(|| {
        let fallback = table.fallback();
        tracing::warn!(formula, roll, fallback, "no fate range matched, using first row");
        fallback
    })
}

/// Evaluate a plain dice formula such as `1d5` or `2`.
///
/// Falls back to reading the string as a literal integer, then to 0.
/// Bonus terms are not allowed here since there is no actor to read.
pub fn evaluate_plain(formula: &str, dice: &dyn DiceSource) -> i32 {
    let evaluated = DiceExpr::parse(formula).and_then(|expr| {
        if expr.has_bonus_terms() {
            Err(MechError::formula(formula, "bonus terms need an actor"))
        } else {
            expr.evaluate(dice, |_| 0)
        }
    });
    match evaluated {
        Ok(evaluation) => evaluation.total,
        Err(e) => {
            tracing::debug!(formula, error = %e, "dice evaluation failed, trying literal");
            formula.trim().parse::<i32>().unwrap_or_else(|_| {
                tracing::warn!(formula, "unusable formula, using 0");
                0
            })
        }
    }
}

/// Wounds gained: the stored roll if present, else a fresh evaluation.
pub fn wounds_bonus(
    formula: &str,
    stored: Option<i32>,
    actor: &Actor,
    dice: &dyn DiceSource,
) -> i32 {
    match stored {
        Some(value) => value,
        None => evaluate_wounds(formula, actor, dice),
    }
}

/// Fate gained: the stored roll if present, else a fresh evaluation.
pub fn fate_bonus(formula: &str, stored: Option<i32>, dice: &dyn DiceSource) -> i32 {
    match stored {
        Some(value) => value,
        None => evaluate_fate(formula, dice),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use rt_core::CharacteristicKey;

    fn tough_actor(toughness: i32) -> Actor {
        let mut actor = Actor::new("Test");
        actor.set_characteristic(CharacteristicKey::Toughness, toughness);
        actor.set_characteristic(CharacteristicKey::Willpower, 31);
        actor
    }

    #[test]
    fn wounds_substitutes_bonuses() {
        let dice = ScriptedDice::new([4]);
        assert_eq!(
            evaluate_wounds("2xTB+1d5+2", &tough_actor(42), &dice),
            14
        );
    }

    #[test]
    fn wounds_with_multiple_tokens() {
        let dice = ScriptedDice::new([]);
        assert_eq!(evaluate_wounds("TB+WB", &tough_actor(42), &dice), 7);
    }

    #[test]
    fn wounds_clamped_at_zero() {
        let dice = ScriptedDice::new([1]);
        assert_eq!(evaluate_wounds("TB-10", &tough_actor(20), &dice), 0);
    }

    #[test]
    fn wounds_missing_characteristic_counts_as_zero() {
        let dice = ScriptedDice::new([]);
        assert_eq!(evaluate_wounds("2xAB+3", &tough_actor(40), &dice), 3);
    }

    #[test]
    fn wounds_malformed_is_zero() {
        let dice = ScriptedDice::new([]);
        assert_eq!(evaluate_wounds("2xQB", &tough_actor(40), &dice), 0);
    }

    #[test]
    fn wounds_out_of_range_is_zero() {
        let dice = ScriptedDice::new([]);
        assert_eq!(evaluate_wounds("2000000000xTB", &tough_actor(40), &dice), 0);
    }

    #[test]
    fn stored_wounds_roll_wins() {
        let dice = ScriptedDice::new([5]);
        for toughness in [10, 40, 70] {
            assert_eq!(
                wounds_bonus("2xTB+1d5+2", Some(13), &tough_actor(toughness), &dice),
                13
            );
        }
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn fate_table_lookup() {
        let formula = "(1-5|=2),(6-10|=3)";
        assert_eq!(evaluate_fate(formula, &ScriptedDice::new([7])), 3);
        assert_eq!(evaluate_fate(formula, &ScriptedDice::new([3])), 2);
    }

    #[test]
    fn fate_without_match_uses_first_row() {
        assert_eq!(
            evaluate_fate("(1-3|=1),(4-6|=2)", &ScriptedDice::new([9])),
            1
        );
    }

    #[test]
    fn fate_malformed_is_zero() {
        assert_eq!(evaluate_fate("three", &ScriptedDice::new([9])), 0);
    }

    #[test]
    fn stored_fate_roll_wins() {
        let dice = ScriptedDice::new([1]);
        assert_eq!(fate_bonus("(1-5|=2),(6-10|=3)", Some(3), &dice), 3);
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn plain_formulas() {
        assert_eq!(evaluate_plain("1d5", &ScriptedDice::new([3])), 3);
        assert_eq!(evaluate_plain("1d5+1", &ScriptedDice::new([5])), 6);
        assert_eq!(evaluate_plain(" 4 ", &ScriptedDice::new([])), 4);
        assert_eq!(evaluate_plain("lots", &ScriptedDice::new([])), 0);
        assert_eq!(evaluate_plain("TB", &ScriptedDice::new([])), 0);
        assert_eq!(evaluate_plain("2000000000+2000000000", &ScriptedDice::new([])), 0);
    }
}
