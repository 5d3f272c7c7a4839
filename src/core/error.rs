//! Error types for the log2 mapper and the paired-series comparator.

use thiserror::Error;

/// A value or range is outside the domain of log2.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
    #[error("log2 is undefined for non-positive value {0}")]
    NonPositive(f64),
    #[error("value is not finite")]
    NotFinite,
    #[error("empty scale range: vmax ({vmax}) must exceed vmin ({vmin})")]
    EmptyRange { vmin: f64, vmax: f64 },
    #[error("bucket step must be at least one exponent")]
    ZeroStep,
}

/// Input series or grids have the wrong shape.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeMismatchError {
    #[error("series lengths differ: baseline has {baseline}, candidate has {candidate}")]
    LengthMismatch { baseline: usize, candidate: usize },
    #[error("input series is empty")]
    Empty,
    #[error("grid row {row} has {found} values, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("grid needs {expected} cells, got {found}")]
    CellCount { expected: usize, found: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Shape(#[from] ShapeMismatchError),
}
