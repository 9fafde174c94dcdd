//! Flat row-major ownership grid and text rendering.
//!
//! Each cell holds the index of the rectangle that covers it, or `None`. The
//! solver mutates one grid in place and records every write on a trail so a
//! branch can be rolled back in LIFO order without copying the grid.

use crate::geometry::Rect;
use crate::puzzle::Puzzle;

/// Converts `(row, col)` to a flat cell index.
#[inline(always)]
pub const fn cell_to_idx(width: usize, row: usize, col: usize) -> usize {
    row * width + col
}

/// Converts a flat cell index back to `(row, col)`.
#[inline(always)]
pub const fn idx_to_cell(width: usize, idx: usize) -> (usize, usize) {
    (idx / width, idx % width)
}

/// Ownership grid with an undo trail.
#[derive(Debug, Clone)]
pub struct OwnerGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<usize>>,
    /// `(cell index, previous owner)` for every write, oldest first.
    trail: Vec<(usize, Option<usize>)>,
}

impl OwnerGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
            trail: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn owner(&self, row: usize, col: usize) -> Option<usize> {
        self.cells[cell_to_idx(self.width, row, col)]
    }

    /// Whether every cell of `rect` is uncovered.
    pub fn is_free(&self, rect: &Rect) -> bool {
        rect.cells().all(|(row, col)| self.owner(row, col).is_none())
    }

    /// Assigns every cell of `rect` to `owner`, logging the previous values.
    pub fn stamp(&mut self, rect: &Rect, owner: usize) {
        for (row, col) in rect.cells() {
            let idx = cell_to_idx(self.width, row, col);
            self.trail.push((idx, self.cells[idx]));
            self.cells[idx] = Some(owner);
        }
    }

    /// Current trail length, to hand back to [`OwnerGrid::undo_to`].
    #[inline]
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Rolls back every write made since `mark`, newest first.
    pub fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some((idx, previous)) = self.trail.pop() {
                self.cells[idx] = previous;
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// Converts a list of rectangles to a flat ownership grid.
///
/// Later rectangles win where they overlap; cells outside all rectangles are `None`.
pub fn solution_to_grid(width: usize, height: usize, rects: &[Rect]) -> Vec<Option<usize>> {
    let mut grid = vec![None; width * height];
    for (index, rect) in rects.iter().enumerate() {
        for (row, col) in rect.cells() {
            if row < height && col < width {
                grid[cell_to_idx(width, row, col)] = Some(index);
            }
        }
    }
    grid
}

/// Formats the clue layout, one row per line, `.` for blank cells.
pub fn format_puzzle(puzzle: &Puzzle) -> String {
    let mut values = vec![None; puzzle.cell_count()];
    for clue in &puzzle.clues {
        if clue.row < puzzle.height && clue.col < puzzle.width {
            values[cell_to_idx(puzzle.width, clue.row, clue.col)] = Some(clue.value);
        }
    }
    let cell_width = puzzle
        .clues
        .iter()
        .map(|clue| clue.value.to_string().len())
        .max()
        .unwrap_or(1);

    let mut output = String::new();
    for row in values.chunks(puzzle.width.max(1)) {
        let line: Vec<String> = row
            .iter()
            .map(|value| match value {
                Some(v) => format!("{v:>cell_width$}"),
                None => format!("{:>cell_width$}", "."),
            })
            .collect();
        output.push_str(&line.join(" "));
        output.push('\n');
    }
    output
}

/// Formats a dissection with one letter per rectangle.
///
/// Rectangles are lettered `A-Z` then `a-z`, cycling after 52. Uncovered
/// cells show as `.`.
pub fn format_solution(width: usize, height: usize, rects: &[Rect]) -> String {
    let grid = solution_to_grid(width, height, rects);

    let mut output = String::new();
    for row in grid.chunks(width.max(1)) {
        for cell in row {
            let display_char = match cell {
                None => '.',
                Some(index) => rect_letter(*index),
            };
            output.push(display_char);
        }
        output.push('\n');
    }
    output
}

fn rect_letter(index: usize) -> char {
    let slot = (index % 52) as u8;
    if slot < 26 {
        char::from(b'A' + slot)
    } else {
        char::from(b'a' + slot - 26)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Clue;

    #[test]
    fn test_coordinate_conversion_roundtrip() {
        for idx in 0..35 {
            let (row, col) = idx_to_cell(7, idx);
            assert!(row < 5 && col < 7);
            assert_eq!(cell_to_idx(7, row, col), idx, "roundtrip failed for {idx}");
        }
    }

    #[test]
    fn test_undo_restores_previous_owners() {
        let mut grid = OwnerGrid::new(3, 2);
        grid.stamp(&Rect::new(0, 0, 1, 2), 0);
        let mark = grid.mark();

        grid.stamp(&Rect::new(0, 1, 2, 2), 1);
        assert!(grid.is_complete());
        assert!(!grid.is_free(&Rect::new(0, 2, 1, 1)));

        grid.undo_to(mark);
        assert_eq!(grid.owner(0, 0), Some(0));
        assert_eq!(grid.owner(1, 2), None);
        assert!(grid.is_free(&Rect::new(0, 1, 2, 2)));
        assert_eq!(grid.mark(), mark);

        grid.undo_to(0);
        assert!(grid.is_free(&Rect::new(0, 0, 3, 2)));
    }

    #[test]
    fn test_format_puzzle() {
        let puzzle = Puzzle {
            width: 4,
            height: 3,
            clues: vec![Clue::new(0, 1, 8), Clue::new(2, 3, 4)],
            solution: vec![Rect::new(0, 0, 4, 2), Rect::new(2, 0, 4, 1)],
        };
        insta::assert_snapshot!(format_puzzle(&puzzle), @r"
        . 8 . .
        . . . .
        . . . 4
        ");
    }

    #[test]
    fn test_format_puzzle_pads_wide_values() {
        let puzzle = Puzzle {
            width: 12,
            height: 1,
            clues: vec![Clue::new(0, 0, 12)],
            solution: vec![Rect::new(0, 0, 12, 1)],
        };
        let rendered = format_puzzle(&puzzle);
        assert!(rendered.starts_with("12  . "), "got {rendered:?}");
    }

    #[test]
    fn test_format_solution() {
        let rects = [
            Rect::new(0, 0, 1, 3),
            Rect::new(0, 1, 3, 2),
            Rect::new(2, 1, 2, 1),
        ];
        insta::assert_snapshot!(format_solution(4, 3, &rects), @r"
        ABBB
        ABBB
        ACC.
        ");
    }

    #[test]
    fn test_letters_cycle_through_both_cases() {
        assert_eq!(rect_letter(0), 'A');
        assert_eq!(rect_letter(25), 'Z');
        assert_eq!(rect_letter(26), 'a');
        assert_eq!(rect_letter(52), 'A');
    }
}
