//! Shikaku Puzzle Engine
//!
//! Generates seeded rectangle-dissection puzzles, solves and colors saved
//! puzzles, and validates submitted dissections from the command line.
//! Logs go to stderr (filter with `RUST_LOG`); results go to stdout.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use shikaku::coloring::{build_adjacency, color_graph, conflicts};
use shikaku::grid::{format_puzzle, format_solution};
use shikaku::{
    generate_with, generate_with_timeout, persistence, solve, validate_json, Difficulty,
    GenerateConfig, GeneratorTuning, Puzzle, Rect, Seed, SolveOptions,
};

/// Display palette used by the `colors` command.
const PALETTE: [&str; 3] = ["#e76f51", "#2a9d8f", "#e9c46a"];

/// Generates, solves, and validates Shikaku puzzles.
#[derive(Parser)]
#[command(name = "shikaku")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a puzzle from a seed and print it.
    Generate {
        #[arg(short, long, value_enum, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
        /// Seed string, e.g. `daily-2024-01-01`.
        #[arg(short, long)]
        seed: Seed,
        #[arg(long)]
        width: Option<usize>,
        #[arg(long)]
        height: Option<usize>,
        /// Save `<OUT>.json` and `<OUT>.txt`.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Generate on a worker thread with this timeout before falling back.
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Print the JSON wire shape instead of the text rendering.
        #[arg(long)]
        json: bool,
    },
    /// Solve the clues of a saved puzzle.
    Solve {
        puzzle: PathBuf,
        /// Stop at the first solution instead of checking uniqueness.
        #[arg(long)]
        first_only: bool,
        #[arg(long, default_value_t = shikaku::solver::DEFAULT_MAX_NODES)]
        max_nodes: usize,
    },
    /// Print a saved puzzle and its solution.
    Show { puzzle: PathBuf },
    /// Assign display colors to a saved puzzle's solution.
    Colors { puzzle: PathBuf },
    /// Reveal one solution rectangle that has not been placed yet.
    Hint {
        puzzle: PathBuf,
        /// File holding the rectangles placed so far.
        #[arg(long)]
        placed: Option<PathBuf>,
    },
    /// Validate a JSON rectangle list against the puzzle a seed stands for.
    Validate {
        /// File holding `[{row, col, width, height}, ...]`.
        rects: PathBuf,
        #[arg(short, long)]
        seed: String,
        #[arg(short, long, value_enum)]
        difficulty: Difficulty,
        #[arg(long)]
        width: usize,
        #[arg(long)]
        height: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            difficulty,
            seed,
            width,
            height,
            out,
            timeout_ms,
            json,
        } => run_generate(difficulty, seed, width, height, out, timeout_ms, json),
        Command::Solve {
            puzzle,
            first_only,
            max_nodes,
        } => run_solve(&puzzle, first_only, max_nodes),
        Command::Show { puzzle } => run_show(&puzzle),
        Command::Colors { puzzle } => run_colors(&puzzle),
        Command::Hint { puzzle, placed } => run_hint(&puzzle, placed.as_deref()),
        Command::Validate {
            rects,
            seed,
            difficulty,
            width,
            height,
        } => run_validate(&rects, &seed, difficulty, width, height),
    }
}

/// Generates a puzzle, optionally saves it, and prints it.
fn run_generate(
    difficulty: Difficulty,
    seed: Seed,
    width: Option<usize>,
    height: Option<usize>,
    out: Option<PathBuf>,
    timeout_ms: Option<u64>,
    json: bool,
) -> ExitCode {
    let config = match build_config(difficulty, seed, width, height) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let tuning = GeneratorTuning::default();
    let puzzle = match timeout_ms {
        Some(ms) => generate_with_timeout(&config, &tuning, Duration::from_millis(ms)),
        None => generate_with(&config, &tuning),
    };

    if let Some(stem) = out {
        match persistence::save(&puzzle, &stem) {
            Ok(path) => eprintln!("Wrote {}", path.display()),
            Err(err) => {
                error!(%err, "failed to save puzzle");
                eprintln!("Failed to save puzzle: {}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&puzzle) {
            Ok(text) => println!("{}", text),
            Err(err) => {
                eprintln!("Failed to encode puzzle: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", render(&puzzle));
    }
    ExitCode::SUCCESS
}

fn build_config(
    difficulty: Difficulty,
    seed: Seed,
    width: Option<usize>,
    height: Option<usize>,
) -> Result<GenerateConfig, shikaku::ConfigError> {
    let config = GenerateConfig::new(difficulty, seed);
    match (width, height) {
        (Some(width), Some(height)) => config.with_size(width, height),
        (Some(width), None) => config.with_width(width),
        (None, Some(height)) => config.with_height(height),
        (None, None) => Ok(config),
    }
}

/// Solves a saved puzzle's clues and prints the result.
fn run_solve(path: &Path, first_only: bool, max_nodes: usize) -> ExitCode {
    let Some(puzzle) = load_or_report(path) else {
        return ExitCode::FAILURE;
    };

    let options = if first_only {
        SolveOptions::first_only()
    } else {
        SolveOptions::default()
    }
    .with_max_nodes(max_nodes);
    let result = solve(&puzzle, &options);

    match &result.solution {
        Some(solution) => {
            print!("{}", format_solution(puzzle.width, puzzle.height, solution));
        }
        None => println!("No solution found"),
    }
    println!(
        "backtracks: {}, nodes: {}, unique: {}{}",
        result.backtracks,
        result.nodes,
        result.is_unique,
        if result.truncated { " (search truncated)" } else { "" }
    );

    if result.solution.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Prints a saved puzzle.
fn run_show(path: &Path) -> ExitCode {
    let Some(puzzle) = load_or_report(path) else {
        return ExitCode::FAILURE;
    };
    print!("{}", render(&puzzle));
    if let Err(err) = puzzle.check_structure() {
        eprintln!("Warning: puzzle is malformed: {}", err);
    }
    ExitCode::SUCCESS
}

/// Prints one color per solution rectangle as JSON.
fn run_colors(path: &Path) -> ExitCode {
    let Some(puzzle) = load_or_report(path) else {
        return ExitCode::FAILURE;
    };

    let graph = build_adjacency(&puzzle.solution);
    let colors = color_graph(&graph, &PALETTE);
    let clashes = conflicts(&graph, &colors);
    if !clashes.is_empty() {
        eprintln!("{} adjacent pairs share a color", clashes.len());
    }

    match serde_json::to_string(&colors) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to encode colors: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Prints the next unplaced solution rectangle as JSON.
fn run_hint(path: &Path, placed: Option<&Path>) -> ExitCode {
    let Some(puzzle) = load_or_report(path) else {
        return ExitCode::FAILURE;
    };

    let placed: Vec<Rect> = match placed {
        None => Vec::new(),
        Some(placed_path) => {
            let parsed = std::fs::read_to_string(placed_path)
                .map_err(|err| err.to_string())
                .and_then(|text| serde_json::from_str(&text).map_err(|err| err.to_string()));
            match parsed {
                Ok(rects) => rects,
                Err(err) => {
                    eprintln!("Failed to read {}: {}", placed_path.display(), err);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    match puzzle.reveal_hint(&placed) {
        Some(rect) => match serde_json::to_string(&rect) {
            Ok(text) => println!("{}", text),
            Err(err) => {
                eprintln!("Failed to encode hint: {}", err);
                return ExitCode::FAILURE;
            }
        },
        None => println!("Every rectangle is already placed"),
    }
    ExitCode::SUCCESS
}

/// Validates a submitted rectangle list and prints the verdict as JSON.
fn run_validate(
    rects: &Path,
    seed: &str,
    difficulty: Difficulty,
    width: usize,
    height: usize,
) -> ExitCode {
    let submission = match std::fs::read_to_string(rects) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Failed to read {}: {}", rects.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let verdict = validate_json(&submission, seed, difficulty, width, height);
    match serde_json::to_string(&verdict) {
        Ok(text) => println!("{}", text),
        Err(err) => eprintln!("Failed to encode verdict: {}", err),
    }

    if verdict.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_or_report(path: &Path) -> Option<Puzzle> {
    match persistence::load(path) {
        Ok(puzzle) => Some(puzzle),
        Err(err) => {
            eprintln!("Failed to load {}: {}", path.display(), err);
            None
        }
    }
}

/// Clue grid, a blank line, then the lettered solution.
fn render(puzzle: &Puzzle) -> String {
    format!(
        "{}\n{}",
        format_puzzle(puzzle),
        format_solution(puzzle.width, puzzle.height, &puzzle.solution)
    )
}
