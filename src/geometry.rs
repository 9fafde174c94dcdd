//! Axis-aligned rectangles and clues on a row-major grid.
//!
//! Rows grow downward and columns grow to the right. A rectangle covers rows
//! `row..row + height` and columns `col..col + width`.

use serde::{Deserialize, Serialize};

/// A grid cell as `(row, col)`.
pub type Cell = (usize, usize);

/// An axis-aligned rectangle of whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(row: usize, col: usize, width: usize, height: usize) -> Self {
        Self {
            row,
            col,
            width,
            height,
        }
    }

    #[inline]
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// One past the last covered row.
    #[inline]
    pub const fn bottom(&self) -> usize {
        self.row + self.height
    }

    /// One past the last covered column.
    #[inline]
    pub const fn right(&self) -> usize {
        self.col + self.width
    }

    #[inline]
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.bottom() && col >= self.col && col < self.right()
    }

    /// Whether the rectangle is non-empty and lies inside a `width x height` grid.
    ///
    /// Safe on untrusted values: coordinates that would overflow do not fit.
    pub const fn fits(&self, width: usize, height: usize) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        match (self.col.checked_add(self.width), self.row.checked_add(self.height)) {
            (Some(right), Some(bottom)) => right <= width && bottom <= height,
            _ => false,
        }
    }

    pub const fn overlaps(&self, other: &Rect) -> bool {
        self.row < other.bottom()
            && other.row < self.bottom()
            && self.col < other.right()
            && other.col < self.right()
    }

    /// Whether the two rectangles share a boundary segment of positive length.
    ///
    /// Touching only at a corner does not count.
    pub const fn shares_edge(&self, other: &Rect) -> bool {
        let rows_overlap = self.row < other.bottom() && other.row < self.bottom();
        let cols_overlap = self.col < other.right() && other.col < self.right();

        let side_by_side = self.right() == other.col || other.right() == self.col;
        let stacked = self.bottom() == other.row || other.bottom() == self.row;

        (side_by_side && rows_overlap) || (stacked && cols_overlap)
    }

    /// Covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.row..self.bottom())
            .flat_map(move |row| (self.col..self.right()).map(move |col| (row, col)))
    }
}

/// A numbered cell demanding a rectangle of exactly `value` cells around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clue {
    pub row: usize,
    pub col: usize,
    pub value: usize,
}

impl Clue {
    pub const fn new(row: usize, col: usize, value: usize) -> Self {
        Self { row, col, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_and_bounds() {
        let rect = Rect::new(1, 2, 3, 4);
        assert_eq!(rect.area(), 12);
        assert_eq!(rect.bottom(), 5);
        assert_eq!(rect.right(), 5);
        assert!(rect.fits(5, 5));
        assert!(!rect.fits(4, 5));
        assert!(!Rect::new(0, 0, 0, 3).fits(5, 5), "zero width never fits");
        assert!(!Rect::new(usize::MAX, 0, 1, 2).fits(5, 5), "overflow never fits");
    }

    #[test]
    fn test_cells_are_row_major() {
        let cells: Vec<Cell> = Rect::new(1, 1, 2, 2).cells().collect();
        assert_eq!(cells, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_overlap_is_symmetric_and_excludes_touching() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(1, 1, 2, 2);
        let c = Rect::new(0, 2, 2, 2);
        assert!(a.overlaps(&b) && b.overlaps(&a));
        assert!(!a.overlaps(&c), "rectangles sharing an edge do not overlap");
    }

    #[test]
    fn test_shared_edge_adjacency() {
        let left = Rect::new(0, 0, 2, 2);
        let right = Rect::new(1, 2, 1, 3);
        let below = Rect::new(2, 0, 2, 1);
        let corner = Rect::new(2, 2, 1, 1);

        assert!(left.shares_edge(&right));
        assert!(right.shares_edge(&left));
        assert!(left.shares_edge(&below));
        assert!(!left.shares_edge(&corner), "corner touches are not adjacency");
    }
}
