//! File I/O for saving and loading puzzles.
//!
//! A puzzle is written twice next to the given stem:
//! - `<stem>.json`: the durable wire shape `{width, height, clues, solution}`
//! - `<stem>.txt`: clue grid and lettered solution for people to read

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::grid::{format_puzzle, format_solution};
use crate::puzzle::Puzzle;

/// Saves a puzzle as JSON and text. Returns the JSON path.
pub fn save(puzzle: &Puzzle, stem: &Path) -> Result<PathBuf, StoreError> {
    if let Some(parent) = stem.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    save_text(puzzle, &append_extension(stem, "txt"))?;
    let json_path = append_extension(stem, "json");
    save_json(puzzle, &json_path)?;
    Ok(json_path)
}

/// `stem` plus `.ext`, keeping any dots already in the file name.
fn append_extension(stem: &Path, ext: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

fn save_json(puzzle: &Puzzle, path: &Path) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, puzzle)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn save_text(puzzle: &Puzzle, path: &Path) -> Result<(), StoreError> {
    let mut file = File::create(path)?;
    let solution = format_solution(puzzle.width, puzzle.height, &puzzle.solution);

    writeln!(
        file,
        "{}x{} puzzle, {} clues\n",
        puzzle.width,
        puzzle.height,
        puzzle.clues.len()
    )?;
    write!(file, "{}", format_puzzle(puzzle))?;
    writeln!(file)?;
    write!(file, "{solution}")?;
    Ok(())
}

/// Loads a puzzle from its JSON file.
pub fn load(path: &Path) -> Result<Puzzle, StoreError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
