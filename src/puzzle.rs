//! The generated puzzle value and its structural invariants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Clue, Rect};

/// A generated puzzle: clue placements plus the dissection they came from.
///
/// `clues[i]` sits inside `solution[i]` and carries its area. Serializes to
/// the durable wire shape `{width, height, clues, solution}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub width: usize,
    pub height: usize,
    pub clues: Vec<Clue>,
    pub solution: Vec<Rect>,
}

/// A broken puzzle invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("{clues} clues but {rects} solution rectangles")]
    CountMismatch { clues: usize, rects: usize },

    #[error("rectangle {index} lies outside the grid")]
    OutOfBounds { index: usize },

    #[error("rectangle {index} has area {area}, below the minimum of 2")]
    TooSmall { index: usize, area: usize },

    #[error("clue {index} is not inside its rectangle")]
    ClueOutside { index: usize },

    #[error("clue {index} has value {value} but its rectangle has area {area}")]
    ValueMismatch { index: usize, value: usize, area: usize },

    #[error("cell ({row}, {col}) is covered twice")]
    Overlap { row: usize, col: usize },

    #[error("cell ({row}, {col}) is not covered")]
    Gap { row: usize, col: usize },
}

impl Puzzle {
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Checks every invariant a generated puzzle must satisfy.
    pub fn check_structure(&self) -> Result<(), StructureError> {
        if self.clues.len() != self.solution.len() {
            return Err(StructureError::CountMismatch {
                clues: self.clues.len(),
                rects: self.solution.len(),
            });
        }

        let mut covered = vec![false; self.cell_count()];
        for (index, (clue, rect)) in self.clues.iter().zip(&self.solution).enumerate() {
            if !rect.fits(self.width, self.height) {
                return Err(StructureError::OutOfBounds { index });
            }
            if rect.area() < 2 {
                return Err(StructureError::TooSmall {
                    index,
                    area: rect.area(),
                });
            }
            if !rect.contains(clue.row, clue.col) {
                return Err(StructureError::ClueOutside { index });
            }
            if clue.value != rect.area() {
                return Err(StructureError::ValueMismatch {
                    index,
                    value: clue.value,
                    area: rect.area(),
                });
            }
            for (row, col) in rect.cells() {
                let cell = &mut covered[row * self.width + col];
                if *cell {
                    return Err(StructureError::Overlap { row, col });
                }
                *cell = true;
            }
        }

        match covered.iter().position(|&c| !c) {
            Some(idx) => Err(StructureError::Gap {
                row: idx / self.width,
                col: idx % self.width,
            }),
            None => Ok(()),
        }
    }

    /// Returns one solution rectangle the player has not placed yet.
    ///
    /// Rectangles are offered in clue order; `None` once every one is placed.
    pub fn reveal_hint(&self, placed: &[Rect]) -> Option<Rect> {
        self.solution
            .iter()
            .find(|rect| !placed.contains(rect))
            .copied()
    }
}
