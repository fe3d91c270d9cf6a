//! Resource counters (wounds, fate, corruption, insanity).
//!
//! Wounds and fate have both a current value and a maximum; corruption and
//! insanity only accumulate. Neither is clamped here: grants adjust both the
//! value and the maximum together, and the host decides what a value above
//! maximum means.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A resource with a current value and a maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Current value.
    pub value: i32,
    /// Maximum value.
    pub max: i32,
}

impl Pool {
    /// Create a full pool.
    pub fn new(max: i32) -> Self {
        Self { value: max, max }
    }

    /// Raise both the value and the maximum by `delta`, saturating.
    pub fn grow(&mut self, delta: i32) {
        self.value = self.value.saturating_add(delta);
        self.max = self.max.saturating_add(delta);
    }

    /// Returns true if the current value is at or below zero.
    pub fn is_empty(&self) -> bool {
        self.value <= 0
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.max)
    }
}

/// A resource that only has a current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    /// Current value.
    pub value: i32,
}

/// The numeric resources tracked on an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    /// Wounds.
    #[serde(default)]
    pub wounds: Pool,
    /// Fate points.
    #[serde(default)]
    pub fate: Pool,
    /// Corruption points.
    #[serde(default)]
    pub corruption: Counter,
    /// Insanity points.
    #[serde(default)]
    pub insanity: Counter,
}
