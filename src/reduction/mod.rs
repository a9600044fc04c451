//! Puzzle reduction problem definition and solution handling

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::SudokuProblem;
pub use solution::{Solution, SolutionMetadata};
pub use validator::{SolutionValidator, ValidationResult, Violation};
