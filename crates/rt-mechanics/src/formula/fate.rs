//! Fate tables: `(min-max|=value)` conditions against one d10.

use crate::error::{MechError, MechResult};

/// One row of a fate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FateRange {
    /// Lowest matching d10 result.
    pub min: u32,
    /// Highest matching d10 result.
    pub max: u32,
    /// Fate granted on a match.
    pub value: i32,
}

impl FateRange {
    /// Whether `roll` falls inside this range.
    pub fn contains(&self, roll: u32) -> bool {
        (self.min..=self.max).contains(&roll)
    }
}

/// A parsed fate table, rows in written order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FateTable {
    /// The rows.
    pub ranges: Vec<FateRange>,
}

impl FateTable {
    /// Parse `(1-5|=2),(6-10|=3)`. A single number is a one-value range.
    pub fn parse(formula: &str) -> MechResult<Self> {
        let ranges = formula
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| parse_range(formula, part))
            .collect::<MechResult<Vec<_>>>()?;
        if ranges.is_empty() {
            return Err(MechError::formula(formula, "no fate ranges"));
        }
        Ok(Self { ranges })
    }

    /// The first row matching `roll`.
    pub fn lookup(&self, roll: u32) -> Option<i32> {
        self.ranges.iter().find(|r| r.contains(roll)).map(|r| r.value)
    }

    /// The first row's value, used when no row matches.
    pub fn fallback(&self) -> i32 {
        self.ranges.first().map(|r| r.value).unwrap_or(0)
    }

    /// Whether every d10 result matches exactly one row.
    pub fn covers_d10(&self) -> bool {
        (1..=10).all(|roll| self.ranges.iter().filter(|r| r.contains(roll)).count() == 1)
    }
}

fn parse_range(formula: &str, part: &str) -> MechResult<FateRange> {
    let inner = part
        .strip_prefix('(')
        .and_then(|p| p.strip_suffix(')'))
        .ok_or_else(|| MechError::formula(formula, format!("expected (range|=value), got {part}")))?;
    let (range, value) = inner
        .split_once("|=")
        .ok_or_else(|| MechError::formula(formula, format!("missing |= in {part}")))?;
    let value = value
        .trim()
        .parse::<i32>()
        .map_err(|_| MechError::formula(formula, format!("bad value in {part}")))?;
    let bound = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|_| MechError::formula(formula, format!("bad range in {part}")))
    };
    let (min, max) = match range.split_once('-') {
        Some((lo, hi)) => (bound(lo)?, bound(hi)?),
        None => {
            let n = bound(range)?;
            (n, n)
        }
    };
    if min > max {
        return Err(MechError::formula(formula, format!("empty range in {part}")));
    }
    Ok(FateRange { min, max, value })
}
