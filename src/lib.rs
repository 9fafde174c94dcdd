//! Shikaku Puzzle Engine Library
//!
//! Generates uniquely solvable rectangle-dissection puzzles from a seed,
//! solves clue layouts with a backtracking constraint solver, colors solved
//! layouts for display, and validates submitted dissections.
//!
//! Every entry point is a pure function of its inputs: the same seed and
//! configuration always produce the same puzzle, on any thread.

pub mod clues;
pub mod coloring;
pub mod difficulty;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod partition;
pub mod persistence;
pub mod puzzle;
pub mod rng;
pub mod solver;
pub mod validator;

pub use coloring::{assign_colors, build_adjacency, AdjacencyGraph};
pub use difficulty::{Difficulty, DifficultyConfig};
pub use error::{ConfigError, SeedError, StoreError};
pub use generator::{
    generate, generate_with, generate_with_timeout, GenerateConfig, GeneratorTuning,
};
pub use geometry::{Clue, Rect};
pub use puzzle::Puzzle;
pub use rng::Seed;
pub use solver::{solve, SolveOptions, SolverResult};
pub use validator::{validate, validate_json, Rejection, Verdict};
