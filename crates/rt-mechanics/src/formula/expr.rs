//! Parsing and evaluation of additive dice expressions.
//!
//! Supports `NdM` and `dM` dice terms, integer constants, and characteristic
//! bonus terms (`TB`, `2xTB`, `3*WB`) joined by `+` and `-`. Whitespace is
//! ignored. There is no multiplication between dice terms and no grouping.

use std::fmt;

use rt_core::CharacteristicKey;

use crate::dice::{DicePool, DiceSource, Die, RollResult};
use crate::error::{MechError, MechResult};

/// Upper bound on the dice in one term, to keep malformed content cheap.
const MAX_DICE_PER_TERM: u32 = 100;

/// Largest die a formula may name.
const MAX_DIE_SIDES: u32 = 1000;

/// One signed term of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    /// `count` dice of one type.
    Dice {
        /// Number of dice.
        count: u32,
        /// Die type.
        die: Die,
    },
    /// An integer constant.
    Constant(i32),
    /// A characteristic bonus times a multiplier.
    Bonus {
        /// The integer prefix, 1 when absent.
        multiplier: i32,
        /// The characteristic whose bonus is used.
        characteristic: CharacteristicKey,
    },
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dice { count, die } => write!(f, "{count}{die}"),
            Self::Constant(n) => write!(f, "{n}"),
            Self::Bonus {
                multiplier: 1,
                characteristic,
            } => write!(f, "{}", characteristic.bonus_token()),
            Self::Bonus {
                multiplier,
                characteristic,
            } => write!(f, "{multiplier}x{}", characteristic.bonus_token()),
        }
    }
}

/// A parsed expression: a sum of signed terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceExpr {
    /// Terms with their sign (+1 or -1).
    pub terms: Vec<(i32, Term)>,
    /// The formula as written.
    pub original: String,
}

/// The outcome of evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// The summed result, before any clamping by the caller.
    pub total: i32,
    /// Every die rolled, in term order.
    pub rolls: RollResult,
}

impl DiceExpr {
    /// Parse a formula.
    pub fn parse(formula: &str) -> MechResult<Self> {
        let compact: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(MechError::formula(formula, "empty formula"));
        }

        let mut terms = Vec::new();
        let mut current = String::new();
        let mut sign = 1;

        for (i, ch) in compact.chars().enumerate() {
            match ch {
                '+' | '-' => {
                    if current.is_empty() && i != 0 {
                        return Err(MechError::formula(formula, "operator without operand"));
                    }
                    if !current.is_empty() {
                        terms.push((sign, parse_term(formula, &current)?));
                        current.clear();
                    }
                    sign = if ch == '+' { 1 } else { -1 };
                }
                _ => current.push(ch),
            }
        }

        if current.is_empty() {
            return Err(MechError::formula(formula, "trailing operator"));
        }
        terms.push((sign, parse_term(formula, &current)?));

        Ok(Self {
            terms,
            original: formula.to_string(),
        })
    }

    /// Returns true if any term references a characteristic bonus.
    pub fn has_bonus_terms(&self) -> bool {
        self.terms
            .iter()
            .any(|(_, t)| matches!(t, Term::Bonus { .. }))
    }

    /// Evaluate, rolling dice from `dice` and reading bonuses from `bonus`.
    ///
    /// Fails only when the sum leaves the `i32` range.
    pub fn evaluate(
        &self,
        dice: &dyn DiceSource,
        bonus: impl Fn(CharacteristicKey) -> i32,
    ) -> MechResult<Evaluation> {
        let overflow = || MechError::formula(&self.original, "result out of range");
        let mut total: i32 = 0;
        let mut rolls = RollResult::default();

        for (sign, term) in &self.terms {
            let value = match term {
                Term::Constant(n) => *n,
                Term::Bonus {
                    multiplier,
                    characteristic,
                } => multiplier
                    .checked_mul(bonus(*characteristic))
                    .ok_or_else(overflow)?,
                Term::Dice { count, die } => {
                    let roll = DicePool::new().add(*die, *count).roll(dice);
                    let subtotal = i32::try_from(roll.total()).map_err(|_| overflow())?;
                    rolls.dice.extend(roll.dice);
                    subtotal
                }
            };
            total = value
                .checked_mul(*sign)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(overflow)?;
        }

        Ok(Evaluation { total, rolls })
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (sign, term)) in self.terms.iter().enumerate() {
            match (i, *sign) {
                (0, -1) => write!(f, "-")?,
                (0, _) => {}
                (_, -1) => write!(f, "-")?,
                _ => write!(f, "+")?,
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

fn parse_term(formula: &str, term: &str) -> MechResult<Term> {
    if let Some(bonus) = parse_bonus_term(term) {
        return Ok(bonus);
    }
    if let Some(d_pos) = term.find(['d', 'D']) {
        let count_str = &term[..d_pos];
        let sides_str = &term[d_pos + 1..];
        let count = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse::<u32>()
                .map_err(|_| MechError::formula(formula, format!("bad dice count in {term}")))?
        };
        if count == 0 || count > MAX_DICE_PER_TERM {
            return Err(MechError::formula(
                formula,
                format!("dice count out of range in {term}"),
            ));
        }
        let sides = sides_str
            .parse::<u32>()
            .map_err(|_| MechError::formula(formula, format!("bad die size in {term}")))?;
        if sides > MAX_DIE_SIDES {
            return Err(MechError::formula(
                formula,
                format!("die size out of range in {term}"),
            ));
        }
        let die = Die::from_sides(sides)?;
        return Ok(Term::Dice { count, die });
    }
    term.parse::<i32>()
        .map(Term::Constant)
        .map_err(|_| MechError::formula(formula, format!("unrecognised term {term}")))
}

/// `TB`, `2TB`, `2xTB`, `2*TB`. Token case must match exactly.
fn parse_bonus_term(term: &str) -> Option<Term> {
    let digits_end = term
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)?;
    let (digits, rest) = term.split_at(digits_end);
    let token = if digits.is_empty() {
        rest
    } else {
        rest.strip_prefix(['x', 'X', '*']).unwrap_or(rest)
    };
    let characteristic = CharacteristicKey::from_bonus_token(token)?;
    let multiplier = if digits.is_empty() {
        1
    } else {
        digits.parse().ok()?
    };
    Some(Term::Bonus {
        multiplier,
        characteristic,
    })
}
