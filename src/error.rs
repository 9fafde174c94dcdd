//! Error types shared across the crate.
//!
//! Search outcomes (contradictions, unsplittable regions) are not errors and
//! never show up here. These types cover bad input at the crate boundary and
//! I/O failures in persistence.

use thiserror::Error;

/// A seed string that cannot drive the generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("seed must not be empty")]
    Empty,
}

/// A generation request that can never yield a well-formed puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be at least 1x1, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    #[error("grid {width}x{height} has fewer than 2 cells")]
    TooSmall { width: usize, height: usize },

    #[error("grid {width}x{height} exceeds the generator's cell limit")]
    TooLarge { width: usize, height: usize },
}

/// Failure while saving or loading a puzzle.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed puzzle json: {0}")]
    Json(#[from] serde_json::Error),
}
