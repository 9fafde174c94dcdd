//! Property tests over generated puzzles: determinism, tiling, solvability,
//! coloring, and validator round trips.

use proptest::prelude::*;

use shikaku::coloring::{build_adjacency, color_graph, conflicts};
use shikaku::validator::check_dissection;
use shikaku::{
    generate, solve, validate, Clue, Difficulty, GenerateConfig, Puzzle, Rect, Rejection, Seed,
    SolveOptions,
};

fn arb_seed() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,16}"
}

fn arb_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![Just(Difficulty::Easy), Just(Difficulty::Medium)]
}

fn generate_for(seed: &str, difficulty: Difficulty) -> Puzzle {
    generate(&GenerateConfig::new(difficulty, Seed::new(seed).unwrap()))
}

/// Two rectangles whose union is itself a rectangle.
fn mergeable_pair(rects: &[Rect]) -> Option<(usize, usize, Rect)> {
    for (i, a) in rects.iter().enumerate() {
        for (j, b) in rects.iter().enumerate().skip(i + 1) {
            let (top, bottom) = if a.row <= b.row { (a, b) } else { (b, a) };
            if top.col == bottom.col && top.width == bottom.width && top.bottom() == bottom.row {
                let union = Rect::new(top.row, top.col, top.width, top.height + bottom.height);
                return Some((i, j, union));
            }
            let (left, right) = if a.col <= b.col { (a, b) } else { (b, a) };
            if left.row == right.row && left.height == right.height && left.right() == right.col {
                let union = Rect::new(left.row, left.col, left.width + right.width, left.height);
                return Some((i, j, union));
            }
        }
    }
    None
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_generation_is_deterministic(seed in arb_seed(), difficulty in arb_difficulty()) {
        prop_assert_eq!(generate_for(&seed, difficulty), generate_for(&seed, difficulty));
    }

    #[test]
    fn test_generated_puzzles_tile_the_grid(seed in arb_seed(), difficulty in arb_difficulty()) {
        let puzzle = generate_for(&seed, difficulty);
        prop_assert_eq!(puzzle.check_structure(), Ok(()));

        let total: usize = puzzle.solution.iter().map(Rect::area).sum();
        prop_assert_eq!(total, puzzle.width * puzzle.height);
        for (clue, rect) in puzzle.clues.iter().zip(&puzzle.solution) {
            prop_assert!(rect.area() >= 2);
            prop_assert!(rect.contains(clue.row, clue.col));
            prop_assert_eq!(clue.value, rect.area());
        }
    }

    #[test]
    fn test_generated_puzzles_are_solvable(seed in arb_seed()) {
        let puzzle = generate_for(&seed, Difficulty::Easy);
        let result = solve(&puzzle, &SolveOptions::default());
        prop_assert!(result.solution.is_some(), "seed {} unsolvable", seed);
    }

    #[test]
    fn test_coloring_conflicts_only_on_exhausted_palette(seed in arb_seed(), difficulty in arb_difficulty()) {
        let puzzle = generate_for(&seed, difficulty);
        let graph = build_adjacency(&puzzle.solution);
        let colors = color_graph(&graph, &[0u8, 1, 2]);

        for (a, b) in conflicts(&graph, &colors) {
            // b was colored after a and only falls back when every color is taken
            let mut taken = [false; 3];
            for &n in graph.neighbors(b).iter().filter(|&&n| n < b) {
                taken[colors[n] as usize] = true;
            }
            prop_assert!(taken.iter().all(|&t| t), "avoidable conflict between {} and {}", a, b);
        }
    }

    #[test]
    fn test_validator_round_trip(seed in arb_seed(), difficulty in arb_difficulty()) {
        let puzzle = generate_for(&seed, difficulty);
        let (width, height) = (puzzle.width, puzzle.height);

        let verdict = validate(&puzzle.solution, &seed, difficulty, width, height);
        prop_assert!(verdict.valid, "own solution rejected: {:?}", verdict.reason);

        let check = |placed: &[Rect]| check_dissection(width, height, &puzzle.clues, placed);

        // overlap
        let mut overlapping = puzzle.solution.clone();
        overlapping.push(puzzle.solution[0]);
        let is_overlap = matches!(check(&overlapping), Err(Rejection::Overlap { .. }));
        prop_assert!(is_overlap);
        prop_assert!(!validate(&overlapping, &seed, difficulty, width, height).valid);

        // uncovered clue
        let missing: Vec<Rect> = puzzle.solution[1..].to_vec();
        let first = puzzle.clues[0];
        prop_assert_eq!(
            check(&missing),
            Err(Rejection::UnclaimedClue { row: first.row, col: first.col })
        );

        // gap: shrink the first rectangle away from its clue
        let rect = puzzle.solution[0];
        let shrunk = if rect.width >= 2 {
            let col = if first.col > rect.col { rect.col + 1 } else { rect.col };
            Rect::new(rect.row, col, rect.width - 1, rect.height)
        } else {
            let row = if first.row > rect.row { rect.row + 1 } else { rect.row };
            Rect::new(row, rect.col, rect.width, rect.height - 1)
        };
        let mut gapped = puzzle.solution.clone();
        gapped[0] = shrunk;
        let is_gap = matches!(check(&gapped), Err(Rejection::Gap { .. }));
        prop_assert!(is_gap);

        // two clues in one rectangle
        if let Some((i, j, union)) = mergeable_pair(&puzzle.solution) {
            let mut merged: Vec<Rect> = puzzle
                .solution
                .iter()
                .enumerate()
                .filter(|&(k, _)| k != i && k != j)
                .map(|(_, rect)| *rect)
                .collect();
            merged.push(union);
            let is_multiple = matches!(
                check(&merged),
                Err(Rejection::MultipleClues { count: 2, .. })
            );
            prop_assert!(is_multiple);
        }
    }
}

#[test]
fn test_wrong_area_with_full_coverage() {
    // 4x2: clues of 4 at (0,0) and (1,3); a 1-column shift keeps one clue per
    // rectangle but breaks both areas
    let puzzle = Puzzle {
        width: 4,
        height: 2,
        clues: vec![Clue::new(0, 0, 4), Clue::new(1, 3, 4)],
        solution: vec![Rect::new(0, 0, 2, 2), Rect::new(0, 2, 2, 2)],
    };
    let shifted = [Rect::new(0, 0, 1, 2), Rect::new(0, 1, 3, 2)];
    assert_eq!(
        check_dissection(4, 2, &puzzle.clues, &shifted),
        Err(Rejection::WrongArea {
            index: 0,
            area: 2,
            value: 4
        })
    );
    assert_eq!(check_dissection(4, 2, &puzzle.clues, &puzzle.solution), Ok(()));
}

#[test]
fn test_solve_matches_generator_on_unique_puzzles() {
    for seed in ["daily-2024-01-01", "weekly-2024-W07", "monthly-2024-02"] {
        let puzzle = generate_for(seed, Difficulty::Easy);
        let result = solve(&puzzle, &SolveOptions::default());
        if result.is_unique {
            assert_eq!(result.solution.as_ref(), Some(&puzzle.solution), "{seed}");
        }
    }
}
