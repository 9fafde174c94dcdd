//! Checks a submitted dissection against the canonical clues for a seed.
//!
//! Clues are always regenerated from `(seed, difficulty, width, height)`;
//! nothing persisted is trusted. The check accepts any legal dissection of
//! those clues, not only the generator's own.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::difficulty::Difficulty;
use crate::generator::{generate, GenerateConfig};
use crate::geometry::{Clue, Rect};
use crate::grid::{cell_to_idx, idx_to_cell};
use crate::rng::Seed;

/// Why a submission was refused. The `Display` text is the reason string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("invalid seed")]
    InvalidSeed,

    #[error("invalid grid size {width}x{height}")]
    InvalidSize { width: usize, height: usize },

    #[error("malformed rectangle list: {0}")]
    Malformed(String),

    #[error("rectangle {index} is out of bounds")]
    OutOfBounds { index: usize },

    #[error("rectangles overlap at ({row}, {col})")]
    Overlap { row: usize, col: usize },

    #[error("clue at ({row}, {col}) is not covered by any rectangle")]
    UnclaimedClue { row: usize, col: usize },

    #[error("cell ({row}, {col}) is not covered")]
    Gap { row: usize, col: usize },

    #[error("rectangle {index} contains no clue")]
    NoClue { index: usize },

    #[error("rectangle {index} contains {count} clues")]
    MultipleClues { index: usize, count: usize },

    #[error("rectangle {index} has area {area} but its clue is {value}")]
    WrongArea {
        index: usize,
        area: usize,
        value: usize,
    },

    #[error("clue at ({row}, {col}) is claimed by more than one rectangle")]
    ClaimedTwice { row: usize, col: usize },
}

/// Verdict wire shape: `{valid, reason?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<Result<(), Rejection>> for Verdict {
    fn from(outcome: Result<(), Rejection>) -> Self {
        match outcome {
            Ok(()) => Verdict {
                valid: true,
                reason: None,
            },
            Err(rejection) => Verdict {
                valid: false,
                reason: Some(rejection.to_string()),
            },
        }
    }
}

/// Validates a submission for the puzzle identified by its generation inputs.
pub fn validate(
    placed: &[Rect],
    seed: &str,
    difficulty: Difficulty,
    width: usize,
    height: usize,
) -> Verdict {
    let outcome = canonical_clues(seed, difficulty, width, height)
        .and_then(|clues| check_dissection(width, height, &clues, placed));
    log_rejection(&outcome, seed);
    outcome.into()
}

/// Validates a JSON rectangle list from an untrusted source.
///
/// Anything that does not parse as non-negative integer rectangles is
/// rejected as malformed.
pub fn validate_json(
    json: &str,
    seed: &str,
    difficulty: Difficulty,
    width: usize,
    height: usize,
) -> Verdict {
    match serde_json::from_str::<Vec<Rect>>(json) {
        Ok(placed) => validate(&placed, seed, difficulty, width, height),
        Err(err) => {
            let outcome = Err(Rejection::Malformed(err.to_string()));
            log_rejection(&outcome, seed);
            outcome.into()
        }
    }
}

fn log_rejection(outcome: &Result<(), Rejection>, seed: &str) {
    if let Err(rejection) = outcome {
        warn!(seed, %rejection, "submission rejected");
    }
}

/// Regenerates the clue layout a seed stands for.
fn canonical_clues(
    seed: &str,
    difficulty: Difficulty,
    width: usize,
    height: usize,
) -> Result<Vec<Clue>, Rejection> {
    let seed = Seed::new(seed).map_err(|_| Rejection::InvalidSeed)?;
    let config = GenerateConfig::new(difficulty, seed)
        .with_size(width, height)
        .map_err(|_| Rejection::InvalidSize { width, height })?;
    Ok(generate(&config).clues)
}

/// Checks that `placed` is a legal dissection for `clues`.
///
/// Rules are checked in a fixed order and the first violation is reported.
pub fn check_dissection(
    width: usize,
    height: usize,
    clues: &[Clue],
    placed: &[Rect],
) -> Result<(), Rejection> {
    if let Some(index) = placed.iter().position(|rect| !rect.fits(width, height)) {
        return Err(Rejection::OutOfBounds { index });
    }

    let mut covered = vec![false; width * height];
    for rect in placed {
        for (row, col) in rect.cells() {
            let cell = &mut covered[cell_to_idx(width, row, col)];
            if *cell {
                return Err(Rejection::Overlap { row, col });
            }
            *cell = true;
        }
    }

    let clue_covered = |clue: &Clue| {
        clue.row < height && clue.col < width && covered[cell_to_idx(width, clue.row, clue.col)]
    };
    if let Some(clue) = clues.iter().find(|clue| !clue_covered(clue)) {
        return Err(Rejection::UnclaimedClue {
            row: clue.row,
            col: clue.col,
        });
    }
    if let Some(idx) = covered.iter().position(|&c| !c) {
        let (row, col) = idx_to_cell(width, idx);
        return Err(Rejection::Gap { row, col });
    }

    let mut claims: FxHashMap<usize, usize> = FxHashMap::default();
    for (index, rect) in placed.iter().enumerate() {
        let inside: Vec<usize> = clues
            .iter()
            .enumerate()
            .filter(|(_, clue)| rect.contains(clue.row, clue.col))
            .map(|(clue_index, _)| clue_index)
            .collect();

        let clue_index = match inside.as_slice() {
            [] => return Err(Rejection::NoClue { index }),
            [only] => *only,
            _ => {
                return Err(Rejection::MultipleClues {
                    index,
                    count: inside.len(),
                })
            }
        };

        let clue = clues[clue_index];
        if rect.area() != clue.value {
            return Err(Rejection::WrongArea {
                index,
                area: rect.area(),
                value: clue.value,
            });
        }
        if claims.insert(clue_index, index).is_some() {
            return Err(Rejection::ClaimedTwice {
                row: clue.row,
                col: clue.col,
            });
        }
    }

    Ok(())
}
