//! Random sources.
//!
//! Sources take `&self` so one can be shared by reference across the async
//! grants engine; implementations keep their state behind a mutex.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces uniformly distributed die results.
pub trait DiceSource: Send + Sync {
    /// Draw an integer in `1..=sides`.
    fn roll(&self, sides: u32) -> u32;

    /// Draw a percentile result in `1..=100`.
    fn d100(&self) -> u32 {
        self.roll(100)
    }

    /// Draw a d10 result in `1..=10`.
    fn d10(&self) -> u32 {
        self.roll(10)
    }
}

/// A [`DiceSource`] backed by a seedable standard RNG.
#[derive(Debug)]
pub struct RngSource {
    rng: Mutex<StdRng>,
}

impl RngSource {
    /// A source with a fixed seed, for reproducible sequences.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// A source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl DiceSource for RngSource {
    fn roll(&self, sides: u32) -> u32 {
        let sides = sides.max(1);
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(1..=sides)
    }
}

/// A [`DiceSource`] that replays queued values.
///
/// Each queued value is clamped into the requested die's range. When the
/// queue runs dry every further roll returns 1.
#[derive(Debug, Default)]
pub struct ScriptedDice {
    queue: Mutex<VecDeque<u32>>,
}

impl ScriptedDice {
    /// Queue the given results in order.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: Mutex::new(values.into_iter().collect()),
        }
    }

    /// Number of queued values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&self, sides: u32) -> u32 {
        let next = self
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(1);
        next.clamp(1, sides.max(1))
    }
}
