//! Backtracking constraint solver for rectangle-dissection puzzles.
//!
//! Search strategy:
//! - Candidates for a clue are every placement of every `w x h` factorisation
//!   of its value that covers the clue cell, stays on free cells, and holds no
//!   other clue
//! - Propagation places any clue with a single candidate and rescans until
//!   nothing is forced; a clue with no candidate is a contradiction
//! - Branching picks the clue with the fewest candidates
//! - All mutation happens in one [`OwnerGrid`]; branches roll back through its
//!   trail instead of copying
//!
//! The number of contradictions met is reported as `backtracks` and doubles as
//! the difficulty measure used during generation.

use serde::Serialize;
use tracing::debug;

use crate::geometry::{Clue, Rect};
use crate::grid::{cell_to_idx, OwnerGrid};
use crate::puzzle::Puzzle;

/// Default node budget for a single solve.
pub const DEFAULT_MAX_NODES: usize = 50_000;

/// Default recursion ceiling.
pub const DEFAULT_MAX_DEPTH: usize = 500;

/// Search limits and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveOptions {
    /// Keep searching after the first solution to decide uniqueness.
    pub find_all: bool,
    /// Node expansions allowed before the search gives up.
    pub max_nodes: usize,
    /// Deepest branching level explored.
    pub max_depth: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            find_all: true,
            max_nodes: DEFAULT_MAX_NODES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SolveOptions {
    pub fn first_only() -> Self {
        Self {
            find_all: false,
            ..Self::default()
        }
    }

    pub fn with_max_nodes(self, max_nodes: usize) -> Self {
        Self { max_nodes, ..self }
    }

    /// Solutions to collect before stopping. Two is enough to prove ambiguity.
    fn max_solutions(&self) -> usize {
        if self.find_all {
            2
        } else {
            1
        }
    }
}

/// Outcome of a solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResult {
    /// First full dissection found, index-aligned with the clues.
    pub solution: Option<Vec<Rect>>,
    /// Contradictions met across the whole search.
    pub backtracks: usize,
    /// Exactly one solution was found and the search ran to completion.
    ///
    /// With `find_all == false` this only means a solution was found.
    pub is_unique: bool,
    /// Node expansions performed.
    pub nodes: usize,
    /// A node or depth cap cut the search short.
    pub truncated: bool,
}

/// Solves the clue layout of `puzzle`, ignoring its recorded solution.
pub fn solve(puzzle: &Puzzle, options: &SolveOptions) -> SolverResult {
    solve_clues(puzzle.width, puzzle.height, &puzzle.clues, options)
}

/// Solves a bare clue layout on a `width x height` grid.
pub fn solve_clues(
    width: usize,
    height: usize,
    clues: &[Clue],
    options: &SolveOptions,
) -> SolverResult {
    if clues
        .iter()
        .any(|clue| clue.row >= height || clue.col >= width)
    {
        return SolverResult {
            solution: None,
            backtracks: 0,
            is_unique: false,
            nodes: 0,
            truncated: false,
        };
    }

    let mut search = Search::new(width, height, clues, *options);
    search.run(0);

    let found = search.solutions.len();
    let result = SolverResult {
        is_unique: found == 1 && !search.truncated,
        solution: search.solutions.into_iter().next(),
        backtracks: search.backtracks,
        nodes: search.nodes,
        truncated: search.truncated,
    };

    debug!(
        width,
        height,
        clues = clues.len(),
        found,
        backtracks = result.backtracks,
        nodes = result.nodes,
        truncated = result.truncated,
        "solve finished"
    );
    result
}

/// Mutable search state for one solve.
struct Search<'a> {
    clues: &'a [Clue],
    /// Clue index sitting on each cell.
    clue_at: Vec<Option<usize>>,
    grid: OwnerGrid,
    /// Placed rectangle per clue; `Some` marks the clue resolved.
    placements: Vec<Option<Rect>>,
    /// Clues resolved so far, oldest first, for rollback.
    resolved: Vec<usize>,
    options: SolveOptions,
    solutions: Vec<Vec<Rect>>,
    backtracks: usize,
    nodes: usize,
    truncated: bool,
}

impl<'a> Search<'a> {
    fn new(width: usize, height: usize, clues: &'a [Clue], options: SolveOptions) -> Self {
        let mut clue_at = vec![None; width * height];
        for (index, clue) in clues.iter().enumerate() {
            clue_at[cell_to_idx(width, clue.row, clue.col)] = Some(index);
        }

        Self {
            clues,
            clue_at,
            grid: OwnerGrid::new(width, height),
            placements: vec![None; clues.len()],
            resolved: Vec::with_capacity(clues.len()),
            options,
            solutions: Vec::new(),
            backtracks: 0,
            nodes: 0,
            truncated: false,
        }
    }

    /// Whether the search as a whole is over.
    fn finished(&self) -> bool {
        self.solutions.len() >= self.options.max_solutions()
            || (self.truncated && self.nodes >= self.options.max_nodes)
    }

    fn run(&mut self, depth: usize) {
        if self.solutions.len() >= self.options.max_solutions() {
            return;
        }
        if self.nodes >= self.options.max_nodes || depth > self.options.max_depth {
            // abandon this path without counting it as a contradiction
            self.truncated = true;
            return;
        }
        self.nodes += 1;

        let mark = self.mark();

        if !self.propagate() {
            self.backtracks += 1;
            self.undo(mark);
            return;
        }

        match self.most_constrained() {
            None => self.record_solution(),
            Some((_, candidates)) if candidates.is_empty() => self.backtracks += 1,
            Some((clue, candidates)) => {
                for candidate in candidates {
                    let branch = self.mark();
                    self.place(clue, candidate);
                    self.run(depth + 1);
                    self.undo(branch);

                    if self.finished() {
                        break;
                    }
                }
            }
        }

        self.undo(mark);
    }

    /// Places forced clues until none remain.
    ///
    /// Returns `false` on contradiction; the caller rolls back.
    fn propagate(&mut self) -> bool {
        loop {
            let mut forced = None;
            for clue in self.unresolved() {
                let candidates = self.candidates(clue);
                match candidates.as_slice() {
                    [] => return false,
                    [only] => {
                        forced = Some((clue, *only));
                        break;
                    }
                    _ => {}
                }
            }

            match forced {
                Some((clue, rect)) => self.place(clue, rect),
                None => return true,
            }
        }
    }

    /// Unresolved clue with the fewest candidates, ties broken by index.
    fn most_constrained(&self) -> Option<(usize, Vec<Rect>)> {
        let mut best: Option<(usize, Vec<Rect>)> = None;
        for clue in self.unresolved() {
            let candidates = self.candidates(clue);
            let better = match &best {
                None => true,
                Some((_, current)) => candidates.len() < current.len(),
            };
            if better {
                let exhausted = candidates.is_empty();
                best = Some((clue, candidates));
                if exhausted {
                    break;
                }
            }
        }
        best
    }

    fn record_solution(&mut self) {
        if !self.grid.is_complete() {
            // every clue placed but cells left over
            self.backtracks += 1;
            return;
        }
        let solution: Vec<Rect> = self.placements.iter().flatten().copied().collect();
        self.solutions.push(solution);
    }

    fn unresolved(&self) -> Vec<usize> {
        (0..self.clues.len())
            .filter(|&clue| self.placements[clue].is_none())
            .collect()
    }

    /// Legal placements for `clue` on the current grid.
    fn candidates(&self, clue: usize) -> Vec<Rect> {
        let Clue { row, col, value } = self.clues[clue];
        let (width, height) = (self.grid.width(), self.grid.height());
        let mut candidates = Vec::new();

        for rect_width in (1..=value.min(width)).filter(|w| value % w == 0) {
            let rect_height = value / rect_width;
            if rect_height > height {
                continue;
            }

            let top_min = (row + 1).saturating_sub(rect_height);
            let top_max = row.min(height - rect_height);
            let left_min = (col + 1).saturating_sub(rect_width);
            let left_max = col.min(width - rect_width);

            for top in top_min..=top_max {
                for left in left_min..=left_max {
                    let rect = Rect::new(top, left, rect_width, rect_height);
                    if self.is_legal(clue, &rect) {
                        candidates.push(rect);
                    }
                }
            }
        }

        candidates
    }

    fn is_legal(&self, clue: usize, rect: &Rect) -> bool {
        self.grid.is_free(rect)
            && rect.cells().all(|(row, col)| {
                self.clue_at[cell_to_idx(self.grid.width(), row, col)]
                    .map_or(true, |other| other == clue)
            })
    }

    fn place(&mut self, clue: usize, rect: Rect) {
        self.grid.stamp(&rect, clue);
        self.placements[clue] = Some(rect);
        self.resolved.push(clue);
    }

    fn mark(&self) -> (usize, usize) {
        (self.grid.mark(), self.resolved.len())
    }

    fn undo(&mut self, (grid_mark, resolved_mark): (usize, usize)) {
        self.grid.undo_to(grid_mark);
        while self.resolved.len() > resolved_mark {
            if let Some(clue) = self.resolved.pop() {
                self.placements[clue] = None;
            }
        }
    }
}
