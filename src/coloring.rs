//! Three-color display assignment for a solved dissection.
//!
//! Works on rectangle geometry only, so it can color any tiling, not just
//! generated ones.

use crate::geometry::Rect;

/// Colors available to the renderer.
pub const PALETTE_SIZE: usize = 3;

/// Undirected graph over rectangles sharing a positive-length edge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdjacencyGraph {
    /// Sorted neighbor indices per rectangle.
    neighbors: Vec<Vec<usize>>,
}

impl AdjacencyGraph {
    /// Builds a graph from an explicit edge list over `len` nodes.
    ///
    /// Self-loops, duplicates, and edges naming a node `>= len` are skipped.
    pub fn from_edges(len: usize, edges: &[(usize, usize)]) -> Self {
        let mut neighbors = vec![Vec::new(); len];
        for &(a, b) in edges {
            if a < len && b < len && a != b && !neighbors[a].contains(&b) {
                neighbors[a].push(b);
                neighbors[b].push(a);
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
        }
        Self { neighbors }
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.neighbors[index]
    }

    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors
            .get(a)
            .map_or(false, |list| list.binary_search(&b).is_ok())
    }

    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }
}

/// Connects every pair of rectangles that share a boundary segment.
pub fn build_adjacency(rects: &[Rect]) -> AdjacencyGraph {
    let mut neighbors = vec![Vec::new(); rects.len()];
    for (i, a) in rects.iter().enumerate() {
        for (j, b) in rects.iter().enumerate().skip(i + 1) {
            if a.shares_edge(b) {
                neighbors[i].push(j);
                neighbors[j].push(i);
            }
        }
    }
    for list in &mut neighbors {
        list.sort_unstable();
    }
    AdjacencyGraph { neighbors }
}

/// Colors each rectangle so that adjacent rectangles differ where possible.
///
/// Returns one palette entry per rectangle, index-aligned with `rects`.
pub fn assign_colors<C: Clone>(rects: &[Rect], palette: &[C; PALETTE_SIZE]) -> Vec<C> {
    color_graph(&build_adjacency(rects), palette)
}

/// Greedy coloring in node order.
///
/// Each node takes the least-used color not held by an already-colored
/// neighbor, ties going to palette order. A node whose neighbors hold every
/// color gets the first palette entry and is left in conflict.
pub fn color_graph<C: Clone>(graph: &AdjacencyGraph, palette: &[C; PALETTE_SIZE]) -> Vec<C> {
    let mut slots: Vec<Option<usize>> = vec![None; graph.len()];
    let mut usage = [0usize; PALETTE_SIZE];

    for node in 0..graph.len() {
        let mut taken = [false; PALETTE_SIZE];
        for &neighbor in graph.neighbors(node) {
            if let Some(slot) = slots[neighbor] {
                taken[slot] = true;
            }
        }

        let slot = (0..PALETTE_SIZE)
            .filter(|&slot| !taken[slot])
            .min_by_key(|&slot| usage[slot])
            .unwrap_or(0);
        slots[node] = Some(slot);
        usage[slot] += 1;
    }

    slots
        .into_iter()
        .map(|slot| palette[slot.unwrap_or(0)].clone())
        .collect()
}

/// Adjacent pairs that ended up with the same color.
pub fn conflicts<C: PartialEq>(graph: &AdjacencyGraph, colors: &[C]) -> Vec<(usize, usize)> {
    (0..graph.len())
        .flat_map(|a| {
            graph
                .neighbors(a)
                .iter()
                .filter(move |&&b| a < b)
                .map(move |&b| (a, b))
        })
        .filter(|&(a, b)| colors[a] == colors[b])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALETTE: [&str; PALETTE_SIZE] = ["red", "green", "blue"];

    fn quadrants() -> Vec<Rect> {
        vec![
            Rect::new(0, 0, 2, 2),
            Rect::new(0, 2, 2, 2),
            Rect::new(2, 0, 2, 2),
            Rect::new(2, 2, 2, 2),
        ]
    }

    #[test]
    fn test_quadrant_adjacency_ignores_diagonals() {
        let graph = build_adjacency(&quadrants());
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(3), &[1, 2]);
        assert!(!graph.are_adjacent(0, 3), "corner touch");
        assert!(!graph.are_adjacent(1, 2), "corner touch");
    }

    #[test]
    fn test_quadrants_balance_colors() {
        let colors = assign_colors(&quadrants(), &PALETTE);
        assert_eq!(colors, vec!["red", "green", "blue", "red"]);
    }

    #[test]
    fn test_strip_tiling_has_no_conflicts() {
        let rects: Vec<Rect> = (0..7).map(|col| Rect::new(0, col, 1, 3)).collect();
        let graph = build_adjacency(&rects);
        let colors = color_graph(&graph, &PALETTE);
        assert_eq!(graph.edge_count(), 6);
        assert!(conflicts(&graph, &colors).is_empty());
        assert_eq!(colors[..3], ["red", "green", "blue"]);
    }

    #[test]
    fn test_complete_graph_falls_back_to_first_color() {
        let edges = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        let graph = AdjacencyGraph::from_edges(4, &edges);
        let colors = color_graph(&graph, &PALETTE);

        assert_eq!(colors, vec!["red", "green", "blue", "red"]);
        assert_eq!(conflicts(&graph, &colors), vec![(0, 3)]);
    }

    #[test]
    fn test_from_edges_skips_invalid_edges() {
        let graph = AdjacencyGraph::from_edges(3, &[(0, 1), (1, 1), (1, 0), (2, 7), (9, 0)]);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.are_adjacent(0, 1));
        assert!(graph.neighbors(2).is_empty());
        assert!(!graph.are_adjacent(9, 0));
    }

    #[test]
    fn test_empty_input() {
        let graph = build_adjacency(&[]);
        assert!(graph.is_empty());
        assert!(assign_colors::<u8>(&[], &[0, 1, 2]).is_empty());
    }
}
