//! Sudoku SAT Reduction
//!
//! This library reduces N x N Sudoku-style puzzles to propositional formulas in
//! DIMACS CNF using a binary (log) encoding of cell values, and decodes solver
//! models back into completed grids.

pub mod config;
pub mod error;
pub mod sudoku;
pub mod sat;
pub mod reduction;
pub mod utils;

pub use config::Settings;
pub use error::{DecodeError, FormulaError, GridError};
pub use reduction::{Solution, SudokuProblem};
pub use sudoku::Grid;

use anyhow::Result;

/// Main entry point: load the configured puzzle and solve it
pub fn solve_puzzle(settings: Settings) -> Result<Option<Solution>> {
    let mut problem = SudokuProblem::new(settings)?;
    problem.solve()
}
