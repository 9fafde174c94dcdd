//! Puzzle generation with difficulty calibration.
//!
//! Each attempt partitions the grid, binds clues, and (for grids that are not
//! large) runs the solver to check uniqueness and measure backtracks. The
//! first attempt whose backtrack count lands in the tier's band is accepted.
//! When none does, the closest unique attempt is used, and failing that a
//! final unconditional pass guarantees a well-formed puzzle.
//!
//! Attempt `i` draws from the seed `"{seed}+{i}"` (attempt 0 uses the bare
//! seed), so the whole process is a pure function of the configuration.
//! Both size draws are always taken, even for explicit sizes, so a puzzle is
//! fully determined by `(seed, difficulty, width, height)`.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clues::bind_clues;
use crate::difficulty::{Difficulty, DifficultyConfig};
use crate::error::ConfigError;
use crate::geometry::Rect;
use crate::partition::partition;
use crate::puzzle::Puzzle;
use crate::rng::{Seed, SeededRng};
use crate::solver::{self, SolveOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES};

/// Seed suffix for the last-resort pass.
const FALLBACK_SUFFIX: &str = "_fallback";

/// Draws spent choosing width and height at the start of every stream.
const SIZE_DRAWS: usize = 2;

/// Largest grid the generator accepts.
pub const MAX_GRID_CELLS: usize = 10_000;

/// Heuristic knobs for the calibration loop.
///
/// These are tuned by hand, not derived; correctness does not depend on them.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorTuning {
    /// Grids with more cells than this count as large.
    pub large_grid_cells: usize,
    pub attempts: usize,
    pub large_attempts: usize,
    /// Failed attempts after which the upper backtrack bound is relaxed.
    pub relax_after: usize,
    /// Multiplier applied to the upper backtrack bound once relaxed.
    pub relax_factor: f64,
    pub max_nodes: usize,
    pub large_max_nodes: usize,
    /// Run the solver on large grids too. Off by default: a partition is
    /// solvable by construction and large solves are slow.
    pub verify_large: bool,
}

impl Default for GeneratorTuning {
    fn default() -> Self {
        Self {
            large_grid_cells: 300,
            attempts: 8,
            large_attempts: 4,
            relax_after: 3,
            relax_factor: 1.5,
            max_nodes: DEFAULT_MAX_NODES,
            large_max_nodes: 10_000,
            verify_large: false,
        }
    }
}

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    difficulty: Difficulty,
    seed: Seed,
    width: Option<usize>,
    height: Option<usize>,
}

impl GenerateConfig {
    /// A puzzle whose size is drawn from the tier's range.
    pub fn new(difficulty: Difficulty, seed: Seed) -> Self {
        Self {
            difficulty,
            seed,
            width: None,
            height: None,
        }
    }

    /// Fixes both dimensions.
    pub fn with_size(self, width: usize, height: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroDimension { width, height });
        }
        match width.checked_mul(height) {
            Some(cells) if cells < 2 => return Err(ConfigError::TooSmall { width, height }),
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => return Err(ConfigError::TooLarge { width, height }),
        }
        Ok(Self {
            width: Some(width),
            height: Some(height),
            ..self
        })
    }

    /// Fixes the width; the height is still drawn.
    pub fn with_width(self, width: usize) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroDimension { width, height: 0 });
        }
        let height = self.height.unwrap_or_else(|| self.largest_drawn_side());
        if width.checked_mul(height).map_or(true, |cells| cells > MAX_GRID_CELLS) {
            return Err(ConfigError::TooLarge { width, height });
        }
        Ok(Self {
            width: Some(width),
            ..self
        })
    }

    /// Fixes the height; the width is still drawn.
    pub fn with_height(self, height: usize) -> Result<Self, ConfigError> {
        if height == 0 {
            return Err(ConfigError::ZeroDimension { width: 0, height });
        }
        let width = self.width.unwrap_or_else(|| self.largest_drawn_side());
        if width.checked_mul(height).map_or(true, |cells| cells > MAX_GRID_CELLS) {
            return Err(ConfigError::TooLarge { width, height });
        }
        Ok(Self {
            height: Some(height),
            ..self
        })
    }

    fn largest_drawn_side(&self) -> usize {
        *self.difficulty.config().grid_size.end()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }
}

/// Generates a puzzle with the default tuning.
pub fn generate(config: &GenerateConfig) -> Puzzle {
    generate_with(config, &GeneratorTuning::default())
}

/// Generates a puzzle. Always returns a well-formed puzzle.
pub fn generate_with(config: &GenerateConfig, tuning: &GeneratorTuning) -> Puzzle {
    let tier = config.difficulty.config();

    let mut sizing = SeededRng::new(&config.seed);
    let drawn_width = sizing.rand_int(*tier.grid_size.start(), *tier.grid_size.end());
    let drawn_height = sizing.rand_int(*tier.grid_size.start(), *tier.grid_size.end());
    let width = config.width.unwrap_or(drawn_width);
    let height = config.height.unwrap_or(drawn_height);

    let large = width * height > tuning.large_grid_cells;
    let verify = !large || tuning.verify_large;
    let attempts = if large {
        tuning.large_attempts
    } else {
        tuning.attempts
    };
    let options = SolveOptions {
        find_all: true,
        max_nodes: if large {
            tuning.large_max_nodes
        } else {
            tuning.max_nodes
        },
        max_depth: DEFAULT_MAX_DEPTH,
    };

    // closest unique attempt to the lower backtrack bound
    let mut best: Option<(usize, Puzzle)> = None;

    for attempt in 0..attempts {
        let seed = if attempt == 0 {
            config.seed.clone()
        } else {
            config.seed.with_suffix(&format!("+{attempt}"))
        };
        let puzzle = build(&seed, width, height, &tier);

        if let Err(err) = puzzle.check_structure() {
            debug!(attempt, %err, "rejected malformed partition");
            continue;
        }
        if !verify {
            info!(seed = %config.seed, width, height, attempt, "accepted large puzzle");
            return puzzle;
        }

        let result = solver::solve(&puzzle, &options);
        let upper = backtrack_ceiling(&tier, tuning, large, attempt);
        let in_band =
            result.backtracks >= tier.backtrack_min && result.backtracks as f64 <= upper;

        debug!(
            attempt,
            backtracks = result.backtracks,
            unique = result.is_unique,
            in_band,
            "generation attempt"
        );

        if !result.is_unique {
            continue;
        }
        if in_band {
            info!(
                seed = %config.seed,
                difficulty = %config.difficulty,
                width,
                height,
                attempt,
                backtracks = result.backtracks,
                "accepted puzzle"
            );
            return puzzle;
        }

        let distance = result.backtracks.abs_diff(tier.backtrack_min);
        if best.as_ref().map_or(true, |(current, _)| distance < *current) {
            best = Some((distance, puzzle));
        }
    }

    if let Some((distance, puzzle)) = best {
        warn!(
            seed = %config.seed,
            difficulty = %config.difficulty,
            distance,
            "no attempt hit the backtrack band, using closest unique puzzle"
        );
        return puzzle;
    }

    warn!(
        seed = %config.seed,
        difficulty = %config.difficulty,
        "no unique attempt, using unverified fallback"
    );
    build(
        &config.seed.with_suffix(FALLBACK_SUFFIX),
        width,
        height,
        &tier,
    )
}

/// Upper backtrack bound for an attempt. Large grids start relaxed; others
/// relax once `relax_after` attempts have failed.
fn backtrack_ceiling(
    tier: &DifficultyConfig,
    tuning: &GeneratorTuning,
    large: bool,
    attempt: usize,
) -> f64 {
    let relax = if large || attempt >= tuning.relax_after {
        tuning.relax_factor
    } else {
        1.0
    };
    tier.backtrack_max as f64 * relax
}

/// Partition and bind clues from one seed.
fn build(seed: &Seed, width: usize, height: usize, tier: &DifficultyConfig) -> Puzzle {
    let mut rng = SeededRng::new(seed);
    // keep this stream aligned with the one that drew the grid size
    rng.burn(SIZE_DRAWS);

    let solution = partition(Rect::new(0, 0, width, height), tier, &mut rng);
    let clues = bind_clues(&solution, &mut rng);

    Puzzle {
        width,
        height,
        clues,
        solution,
    }
}

/// Generates on a worker thread, falling back to the calling thread if the
/// worker does not answer within `timeout`.
///
/// Generation is pure, so the fallback returns the same puzzle the worker
/// would have; a late worker result is dropped.
pub fn generate_with_timeout(
    config: &GenerateConfig,
    tuning: &GeneratorTuning,
    timeout: Duration,
) -> Puzzle {
    let (sender, receiver) = mpsc::channel();
    let worker_config = config.clone();
    let worker_tuning = tuning.clone();

    let spawned = thread::Builder::new()
        .name("shikaku-generate".into())
        .spawn(move || {
            // the receiver is gone if we already timed out
            let _ = sender.send(generate_with(&worker_config, &worker_tuning));
        });

    if let Err(err) = spawned {
        warn!(%err, "could not start generation worker, generating in-process");
        return generate_with(config, tuning);
    }

    match receiver.recv_timeout(timeout) {
        Ok(puzzle) => puzzle,
        Err(RecvTimeoutError::Timeout) => {
            warn!(
                ?timeout,
                seed = %config.seed,
                "generation worker timed out, generating in-process"
            );
            generate_with(config, tuning)
        }
        Err(RecvTimeoutError::Disconnected) => {
            warn!(seed = %config.seed, "generation worker failed, generating in-process");
            generate_with(config, tuning)
        }
    }
}
