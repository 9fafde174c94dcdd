//! Places one clue inside each rectangle of a dissection.

use crate::geometry::{Clue, Rect};
use crate::rng::SeededRng;

/// Picks a uniformly random cell in each rectangle and labels it with the area.
///
/// The output is index-aligned with `rects`.
pub fn bind_clues(rects: &[Rect], rng: &mut SeededRng) -> Vec<Clue> {
    rects
        .iter()
        .map(|rect| {
            let pick = rng.rand_int(0, rect.area() - 1);
            let row = rect.row + pick / rect.width;
            let col = rect.col + pick % rect.width;
            Clue::new(row, col, rect.area())
        })
        .collect()
}
