//! Typed errors for the puzzle, formula and assignment boundaries

use thiserror::Error;

/// Problems with an input grid, detected before any clause is compiled
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid is empty or contains no valid rows")]
    Empty,

    #[error("Row {row} has {actual} values, expected {expected} (the grid must be N x N)")]
    NotSquare {
        row: usize,
        actual: usize,
        expected: usize,
    },

    #[error("Grid size {0} has no integer square root, so it cannot be split into blocks")]
    NoBlockSize(usize),

    #[error("Value {value} at ({row}, {col}) is outside 0..={max}")]
    ValueOutOfRange {
        row: usize,
        col: usize,
        value: usize,
        max: usize,
    },

    #[error("Invalid token '{token}' in row {row}")]
    InvalidToken { row: usize, token: String },

    #[error("Grid of size {size} must hold {size}x{size} cells, found {actual}")]
    CellCount { size: usize, actual: usize },

    #[error("Grid of size {size} cannot have block size {block_size}")]
    BlockSizeMismatch { size: usize, block_size: usize },

    #[error("Grid size {0} needs more variables than a 32-bit literal can address")]
    TooLarge(usize),
}

/// Failures while streaming a formula to storage
#[derive(Debug, Error)]
pub enum FormulaError {
    #[error("I/O error while writing formula: {0}")]
    Io(#[from] std::io::Error),

    #[error("Header announced {expected} clauses but {written} were written")]
    ClauseCountMismatch { expected: usize, written: usize },
}

/// Failures while reading solver output back into a grid
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Solver output is empty")]
    MissingMarker,

    #[error("Unexpected satisfiability marker '{0}'")]
    UnexpectedMarker(String),

    #[error("Solver could not decide the instance (marker '{0}')")]
    Indeterminate(String),

    #[error("Invalid literal '{0}' in assignment")]
    InvalidLiteral(String),

    #[error("Literal {literal} at position {position} is out of variable order")]
    OutOfOrder { position: usize, literal: i32 },

    #[error("Assignment has {count} literals, not a multiple of the bit width {width}")]
    NotMultipleOfWidth { count: usize, width: usize },

    #[error("Assignment has {actual} literals, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Cell {cell} decodes to {value}, outside 1..={max}")]
    ValueOutOfRange { cell: usize, value: usize, max: usize },
}
