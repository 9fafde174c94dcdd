//! Deterministic random stream derived from a string seed.
//!
//! The seed string is folded into a 32-bit state with a `31 * h + unit` hash
//! over its UTF-16 code units, then advanced with a mulberry32 mix. Both steps
//! use only wrapping 32-bit arithmetic, so a given seed yields the same
//! sequence on every platform and in every language that follows the same
//! recipe.

use std::fmt;
use std::str::FromStr;

use crate::error::SeedError;

/// A non-empty seed string.
///
/// Seed formats such as `daily-2024-01-01` are owned by whoever schedules
/// puzzles; this type only guarantees the string can drive a generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Seed(String);

impl Seed {
    pub fn new(seed: impl Into<String>) -> Result<Self, SeedError> {
        let seed = seed.into();
        if seed.is_empty() {
            return Err(SeedError::Empty);
        }
        Ok(Self(seed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives a sibling seed by appending `suffix`.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{}", self.0, suffix))
    }
}

impl FromStr for Seed {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mulberry32 generator seeded from a [`Seed`].
///
/// Passed around by `&mut` so every consumer draws from an explicit stream.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: &Seed) -> Self {
        let state = seed
            .as_str()
            .encode_utf16()
            .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)));
        Self { state }
    }

    /// Returns the next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Returns an integer in `[min, max]` inclusive.
    ///
    /// An inverted range collapses to `min`.
    pub fn rand_int(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        min + (self.next_f64() * span) as usize
    }

    /// Draws and discards `count` values to keep parallel streams aligned.
    pub fn burn(&mut self, count: usize) {
        for _ in 0..count {
            self.next_f64();
        }
    }
}

/// Fisher-Yates shuffle into a new vector, leaving `items` untouched.
pub fn shuffle<T: Clone>(items: &[T], rng: &mut SeededRng) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.rand_int(0, i);
        shuffled.swap(i, j);
    }
    shuffled
}
