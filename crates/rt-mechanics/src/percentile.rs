//! Percentile test resolution.
//!
//! Roll a d100 and compare against a target number. The result is a success
//! if the roll is at or below the target. The margin, in whole tens plus one,
//! gives the degrees of success or failure. Three or more degrees, or a roll
//! at the extremes of the die (01-05, 96-00), makes the outcome critical.
//! Doubles (11, 22, ..., 99) on a success trigger the special effect of
//! called shots and similar actions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::DiceSource;

/// Degrees needed for a critical success or failure regardless of the roll.
pub const CRITICAL_DEGREES: u32 = 3;

/// Rolls at or below this value are critical successes when they succeed.
pub const CRITICAL_SUCCESS_MAX_ROLL: u32 = 5;

/// Rolls at or above this value are critical failures when they fail.
pub const CRITICAL_FAILURE_MIN_ROLL: u32 = 96;

/// The fully classified outcome of one percentile test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestOutcome {
    /// The target number tested against.
    pub target: i32,
    /// The d100 result, 1-100.
    pub roll: u32,
    /// Named modifiers, for display only. `target` already includes them.
    pub modifiers: BTreeMap<String, i32>,
    /// Sum of `modifiers`.
    pub modifier_total: i32,
    /// Whether the roll was at or below the target.
    pub is_success: bool,
    /// Degrees of success, 0 on failure.
    pub degrees_of_success: u32,
    /// Degrees of failure, 0 on success.
    pub degrees_of_failure: u32,
    /// Degrees of success, or negated degrees of failure.
    pub degrees: i32,
    /// A success with a roll of 01-05 or three or more degrees.
    pub is_critical_success: bool,
    /// A failure with a roll of 96-00 or three or more degrees.
    pub is_critical_failure: bool,
    /// The roll shows the same digit twice (11, 22, ..., 99).
    pub is_doubles: bool,
    /// A successful doubles roll.
    pub triggers_special_effect: bool,
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match (self.is_success, self.is_critical_success, self.is_critical_failure) {
            (true, true, _) => "Critical Success",
            (true, false, _) => "Success",
            (false, _, true) => "Critical Failure",
            (false, _, false) => "Failure",
        };
        let degrees = if self.is_success {
            format!("{} DoS", self.degrees_of_success)
        } else {
            format!("{} DoF", self.degrees_of_failure)
        };
        write!(f, "{:02} vs {}: {verdict} ({degrees})", self.roll, self.target)?;
        if self.triggers_special_effect {
            write!(f, " [doubles]")?;
        }
        Ok(())
    }
}

/// Roll a d100 from `dice` and classify it against `target`.
///
/// `target` is not clamped; a negative target always fails and a target of
/// 100 or more always succeeds.
pub fn resolve(
    target: i32,
    modifiers: &BTreeMap<String, i32>,
    dice: &dyn DiceSource,
) -> TestOutcome {
    let roll = dice.d100();
    let outcome = classify(target, roll, modifiers);
    tracing::debug!(target_number = target, roll, degrees = outcome.degrees, "percentile test");
    outcome
}

/// Classify a known roll against `target`. Pure; `resolve` without the draw.
pub fn classify(target: i32, roll: u32, modifiers: &BTreeMap<String, i32>) -> TestOutcome {
    // Margins span the whole i32 range of targets, so work in i64.
    let roll_value = i64::from(roll);
    let target_value = i64::from(target);
    let is_success = roll_value <= target_value;

    let degrees_of_success = if is_success {
        degrees_for_margin(target_value - roll_value)
    } else {
        0
    };
    let degrees_of_failure = if is_success {
        0
    } else {
        degrees_for_margin(roll_value - target_value)
    };
    let degrees = if is_success {
        i32::try_from(degrees_of_success).unwrap_or(i32::MAX)
    } else {
        i32::try_from(degrees_of_failure).map_or(i32::MIN, |d| -d)
    };

    let is_critical_success = is_success
        && (roll <= CRITICAL_SUCCESS_MAX_ROLL || degrees_of_success >= CRITICAL_DEGREES);
    let is_critical_failure = !is_success
        && (roll >= CRITICAL_FAILURE_MIN_ROLL || degrees_of_failure >= CRITICAL_DEGREES);

    let doubles = is_doubles(roll);

    TestOutcome {
        target,
        roll,
        modifiers: modifiers.clone(),
        modifier_total: sum_modifiers(modifiers),
        is_success,
        degrees_of_success,
        degrees_of_failure,
        degrees,
        is_critical_success,
        is_critical_failure,
        is_doubles: doubles,
        triggers_special_effect: is_success && doubles,
    }
}

/// Whole tens of a non-negative margin, plus one.
fn degrees_for_margin(margin: i64) -> u32 {
    u32::try_from(margin.max(0) / 10 + 1).unwrap_or(u32::MAX)
}

fn sum_modifiers(modifiers: &BTreeMap<String, i32>) -> i32 {
    modifiers.values().fold(0, |sum, m| sum.saturating_add(*m))
}

/// Check if a d100 roll shows doubles.
///
/// Only 11, 22, ..., 99 qualify. Single-digit rolls read as 01-09 and are
/// not doubles; 100 reads as tens 10, ones 0 and is not doubles either.
pub fn is_doubles(roll: u32) -> bool {
    if !(10..=99).contains(&roll) {
        return false;
    }
    roll / 10 == roll % 10
}

/// A base value plus the sum of named modifiers.
pub fn target_with_modifiers(base: i32, modifiers: &BTreeMap<String, i32>) -> i32 {
    base.saturating_add(sum_modifiers(modifiers))
}

/// Clamp a target into the rollable range 1-100.
pub fn clamp_target(target: i32) -> i32 {
    target.clamp(1, 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use proptest::prelude::*;

    fn no_mods() -> BTreeMap<String, i32> {
        BTreeMap::new()
    }

    #[test]
    fn success_with_three_degrees_is_critical() {
        let o = classify(50, 23, &no_mods());
        assert!(o.is_success);
        assert_eq!(o.degrees_of_success, 3);
        assert_eq!(o.degrees_of_failure, 0);
        assert_eq!(o.degrees, 3);
        assert!(o.is_critical_success);
        assert!(!o.is_critical_failure);
    }

    #[test]
    fn high_failure_is_critical() {
        let o = classify(50, 97, &no_mods());
        assert!(!o.is_success);
        assert_eq!(o.degrees_of_failure, 5);
        assert_eq!(o.degrees, -5);
        assert!(o.is_critical_failure);
    }

    #[test]
    fn success_at_target_has_one_degree() {
        let o = classify(60, 60, &no_mods());
        assert!(o.is_success);
        assert_eq!(o.degrees_of_success, 1);
        assert!(!o.is_critical_success);
    }

    #[test]
    fn low_roll_is_critical_success() {
        let o = classify(30, 4, &no_mods());
        assert_eq!(o.degrees_of_success, 3);
        assert!(o.is_critical_success);
        let o = classify(8, 5, &no_mods());
        assert_eq!(o.degrees_of_success, 1);
        assert!(o.is_critical_success);
    }

    #[test]
    fn roll_of_96_fails_critically_even_close_to_target() {
        let o = classify(95, 96, &no_mods());
        assert!(!o.is_success);
        assert_eq!(o.degrees_of_failure, 1);
        assert!(o.is_critical_failure);
    }

    #[test]
    fn targets_outside_range_are_not_clamped() {
        let o = classify(-15, 1, &no_mods());
        assert!(!o.is_success);
        assert_eq!(o.degrees_of_failure, 2);
        let o = classify(130, 100, &no_mods());
        assert!(o.is_success);
        assert_eq!(o.degrees_of_success, 4);
    }

    #[test]
    fn doubles_check() {
        assert!(is_doubles(11));
        assert!(is_doubles(55));
        assert!(is_doubles(99));
        assert!(!is_doubles(10));
        assert!(!is_doubles(100));
        assert!(!is_doubles(5));
        assert!(!is_doubles(1));
        assert!(!is_doubles(12));
    }

    #[test]
    fn special_effect_only_on_successful_doubles() {
        assert!(classify(50, 33, &no_mods()).triggers_special_effect);
        let miss = classify(50, 66, &no_mods());
        assert!(miss.is_doubles);
        assert!(!miss.triggers_special_effect);
    }

    #[test]
    fn modifiers_are_reported_not_applied() {
        let mut mods = BTreeMap::new();
        mods.insert("aim".to_string(), 10);
        mods.insert("darkness".to_string(), -20);
        let o = classify(40, 35, &mods);
        assert_eq!(o.modifier_total, -10);
        assert_eq!(o.target, 40);
        assert!(o.is_success);
    }

    #[test]
    fn resolve_draws_from_source() {
        let dice = ScriptedDice::new([44]);
        let o = resolve(44, &no_mods(), &dice);
        assert_eq!(o.roll, 44);
        assert!(o.is_success);
        assert!(o.triggers_special_effect);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn target_helpers() {
        let mut mods = BTreeMap::new();
        mods.insert("range".to_string(), 10);
        assert_eq!(target_with_modifiers(35, &mods), 45);
        assert_eq!(clamp_target(-5), 1);
        assert_eq!(clamp_target(120), 100);
        assert_eq!(clamp_target(42), 42);
    }

    #[test]
    fn display() {
        assert_eq!(
            classify(50, 23, &no_mods()).to_string(),
            "23 vs 50: Critical Success (3 DoS)"
        );
        assert_eq!(
            classify(50, 7, &no_mods()).to_string(),
            "07 vs 50: Critical Success (5 DoS)"
        );
        assert_eq!(
            classify(40, 44, &no_mods()).to_string(),
            "44 vs 40: Failure (1 DoF)"
        );
        assert_eq!(
            classify(40, 22, &no_mods()).to_string(),
            "22 vs 40: Success (2 DoS) [doubles]"
        );
    }

    proptest! {
        #[test]
        fn classification_invariants(target in 1i32..=100, roll in 1u32..=100) {
            let o = classify(target, roll, &BTreeMap::new());
            prop_assert_eq!(o.is_success, roll as i32 <= target);
            if o.is_success {
                prop_assert_eq!(o.degrees_of_success as i32, (target - roll as i32) / 10 + 1);
                prop_assert_eq!(o.degrees_of_failure, 0);
            } else {
                prop_assert_eq!(o.degrees_of_failure as i32, (roll as i32 - target) / 10 + 1);
                prop_assert_eq!(o.degrees_of_success, 0);
            }
            prop_assert!(!o.is_critical_success || o.is_success);
            prop_assert!(!o.is_critical_failure || !o.is_success);
            prop_assert!(!o.triggers_special_effect || (o.is_success && o.is_doubles));
            prop_assert!(o.degrees != 0);
        }

        #[test]
        fn any_target_classifies(target in any::<i32>(), roll in 1u32..=100) {
            let o = classify(target, roll, &BTreeMap::new());
            prop_assert_eq!(o.is_success, i64::from(roll) <= i64::from(target));
            prop_assert!(o.degrees_of_success >= 1 || o.degrees_of_failure >= 1);
            prop_assert_eq!(o.degrees > 0, o.is_success);
        }
    }

    #[test]
    fn extreme_targets() {
        let low = classify(i32::MIN, 50, &no_mods());
        assert!(!low.is_success);
        assert_eq!(low.degrees_of_failure, 214_748_370);
        assert_eq!(low.degrees, -214_748_370);
        assert!(low.is_critical_failure);

        let high = classify(i32::MAX, 1, &no_mods());
        assert!(high.is_success);
        assert_eq!(high.degrees_of_success, 214_748_365);

        let mods = BTreeMap::from([("a".to_string(), i32::MAX), ("b".to_string(), 10)]);
        assert_eq!(target_with_modifiers(10, &mods), i32::MAX);
    }
}
