//! Difficulty tiers and the generation bounds attached to each.

use std::fmt;
use std::ops::RangeInclusive;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Advertised difficulty of a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

/// Bounds the partitioner and calibrator work within for one tier.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyConfig {
    /// Range the width and height are each drawn from when not given.
    pub grid_size: RangeInclusive<usize>,
    /// Smallest rectangle area the partitioner may emit.
    pub min_area: usize,
    /// Area above which the partitioner always tries to split.
    pub max_area: usize,
    /// Accepted solver backtrack band, before relaxation.
    pub backtrack_min: usize,
    pub backtrack_max: usize,
    /// Chance of splitting a region that is already within the area bounds.
    pub split_probability: f64,
    /// Chance of carving a one-cell strip instead of a binary split.
    pub elongated_bias: f64,
}

impl DifficultyConfig {
    /// Area below which no region is ever cut.
    ///
    /// A single-cell rectangle would need a clue of 1, which is never legal.
    pub fn area_floor(&self) -> usize {
        self.min_area.max(2)
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn config(self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                grid_size: 5..=7,
                min_area: 2,
                max_area: 8,
                backtrack_min: 0,
                backtrack_max: 2,
                split_probability: 0.2,
                elongated_bias: 0.1,
            },
            Difficulty::Medium => DifficultyConfig {
                grid_size: 7..=10,
                min_area: 2,
                max_area: 10,
                backtrack_min: 0,
                backtrack_max: 15,
                split_probability: 0.25,
                elongated_bias: 0.15,
            },
            Difficulty::Hard => DifficultyConfig {
                grid_size: 10..=14,
                min_area: 2,
                max_area: 12,
                backtrack_min: 2,
                backtrack_max: 60,
                split_probability: 0.3,
                elongated_bias: 0.2,
            },
            Difficulty::Expert => DifficultyConfig {
                grid_size: 14..=20,
                min_area: 3,
                max_area: 16,
                backtrack_min: 8,
                backtrack_max: 200,
                split_probability: 0.35,
                elongated_bias: 0.25,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        };
        f.write_str(name)
    }
}
