//! Recursive dissection of a rectangle into smaller rectangles.
//!
//! Each region either stops as a leaf or is cut. A cut is either a one-cell
//! strip peeled off an edge or a binary split along one axis. No cut ever
//! leaves a piece smaller than [`DifficultyConfig::area_floor`], so every leaf
//! can carry a clue of at least 2.

use crate::difficulty::DifficultyConfig;
use crate::geometry::Rect;
use crate::rng::{shuffle, SeededRng};

/// Binary split attempts per region before giving up and keeping it whole.
const SPLIT_ATTEMPTS: usize = 5;

/// Chance of cutting across the longer dimension of a non-square region.
const LONG_AXIS_BIAS: f64 = 0.8;

/// Split-position strategy weights: edge-biased, then wide-range; the rest
/// is center-biased.
const EDGE_BIASED_WEIGHT: f64 = 0.15;
const WIDE_RANGE_WEIGHT: f64 = 0.25;

/// Edge a one-cell strip is peeled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

const EDGES: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

/// Splits `region` into rectangles that tile it exactly.
///
/// A region that cannot be cut legally comes back whole, even when it is
/// larger than `config.max_area`.
pub fn partition(region: Rect, config: &DifficultyConfig, rng: &mut SeededRng) -> Vec<Rect> {
    let mut leaves = Vec::new();
    partition_into(region, config, rng, &mut leaves);
    leaves
}

fn partition_into(
    region: Rect,
    config: &DifficultyConfig,
    rng: &mut SeededRng,
    leaves: &mut Vec<Rect>,
) {
    let area = region.area();
    if (config.min_area..=config.max_area).contains(&area)
        && rng.next_f64() > config.split_probability
    {
        leaves.push(region);
        return;
    }

    let floor = config.area_floor();
    if area < 2 * floor {
        leaves.push(region);
        return;
    }

    if rng.next_f64() < config.elongated_bias {
        if let Some((strip, rest)) = carve_strip(region, config, rng) {
            leaves.push(strip);
            partition_into(rest, config, rng, leaves);
            return;
        }
    }

    for _ in 0..SPLIT_ATTEMPTS {
        if let Some((first, second)) = binary_split(region, floor, rng) {
            partition_into(first, config, rng, leaves);
            partition_into(second, config, rng, leaves);
            return;
        }
    }

    leaves.push(region);
}

/// Peels a one-cell-wide strip off an edge chosen among the legal ones.
///
/// Returns `(strip, remainder)`.
fn carve_strip(
    region: Rect,
    config: &DifficultyConfig,
    rng: &mut SeededRng,
) -> Option<(Rect, Rect)> {
    let floor = config.area_floor();
    let legal: Vec<(Rect, Rect)> = EDGES
        .iter()
        .filter_map(|&edge| strip_from(region, edge))
        .filter(|(strip, rest)| {
            (floor..=config.max_area).contains(&strip.area()) && rest.area() >= floor
        })
        .collect();

    shuffle(&legal, rng).into_iter().next()
}

fn strip_from(region: Rect, edge: Edge) -> Option<(Rect, Rect)> {
    let Rect {
        row,
        col,
        width,
        height,
    } = region;

    match edge {
        Edge::Top | Edge::Bottom if height < 2 => None,
        Edge::Left | Edge::Right if width < 2 => None,
        Edge::Top => Some((
            Rect::new(row, col, width, 1),
            Rect::new(row + 1, col, width, height - 1),
        )),
        Edge::Bottom => Some((
            Rect::new(row + height - 1, col, width, 1),
            Rect::new(row, col, width, height - 1),
        )),
        Edge::Left => Some((
            Rect::new(row, col, 1, height),
            Rect::new(row, col + 1, width - 1, height),
        )),
        Edge::Right => Some((
            Rect::new(row, col + width - 1, 1, height),
            Rect::new(row, col, width - 1, height),
        )),
    }
}

/// One attempt at cutting `region` in two along an axis.
fn binary_split(region: Rect, floor: usize, rng: &mut SeededRng) -> Option<(Rect, Rect)> {
    let long_is_width = region.width > region.height;
    let cut_columns = if region.width == region.height {
        rng.next_f64() < 0.5
    } else {
        (rng.next_f64() < LONG_AXIS_BIAS) == long_is_width
    };

    let length = if cut_columns {
        region.width
    } else {
        region.height
    };
    if length < 2 {
        return None;
    }

    let position = split_position(length, rng)?;
    let (first, second) = if cut_columns {
        (
            Rect::new(region.row, region.col, position, region.height),
            Rect::new(region.row, region.col + position, region.width - position, region.height),
        )
    } else {
        (
            Rect::new(region.row, region.col, region.width, position),
            Rect::new(region.row + position, region.col, region.width, region.height - position),
        )
    };

    (first.area() >= floor && second.area() >= floor).then_some((first, second))
}

/// Picks a cut offset in `1..length` using a weighted strategy.
fn split_position(length: usize, rng: &mut SeededRng) -> Option<usize> {
    let strategy = rng.next_f64();
    let (low, high) = if strategy < EDGE_BIASED_WEIGHT {
        let position = if rng.next_f64() < 0.5 { 1 } else { length - 1 };
        (position, position)
    } else if strategy < EDGE_BIASED_WEIGHT + WIDE_RANGE_WEIGHT {
        fraction_range(length, 0.1, 0.9)
    } else {
        fraction_range(length, 0.3, 0.7)
    };

    (low <= high).then(|| rng.rand_int(low, high))
}

/// Cut offsets between `low` and `high` fractions of `length`, clamped to `1..length`.
fn fraction_range(length: usize, low: f64, high: f64) -> (usize, usize) {
    let start = ((length as f64 * low).ceil() as usize).max(1);
    let end = ((length as f64 * high).floor() as usize).min(length - 1);
    (start, end)
}
