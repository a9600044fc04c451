//! Independent check that a decoded grid solves its puzzle

use crate::sudoku::{Grid, SudokuRules};
use itertools::Itertools;
use std::time::Instant;

/// Validates solved grids against their puzzles without going through SAT
#[derive(Debug, Default)]
pub struct SolutionValidator;

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    pub cells_checked: usize,
    pub validation_time_ms: u64,
}

/// One way in which a grid fails to solve its puzzle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    DimensionMismatch { puzzle: usize, solution: usize },
    ClueChanged { row: usize, col: usize, clue: usize, value: usize },
    ValueOutOfRange { row: usize, col: usize, value: usize },
    Duplicate { unit: String, value: usize },
}

impl SolutionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate that `solution` is a complete grid that keeps every clue of `puzzle`
    pub fn validate(&self, puzzle: &Grid, solution: &Grid) -> ValidationResult {
        let start_time = Instant::now();

        if puzzle.size != solution.size {
            return ValidationResult {
                is_valid: false,
                violations: vec![Violation::DimensionMismatch {
                    puzzle: puzzle.size,
                    solution: solution.size,
                }],
                cells_checked: 0,
                validation_time_ms: start_time.elapsed().as_millis() as u64,
            };
        }

        let size = solution.size;
        let mut violations = Vec::new();

        for (index, (&clue, &value)) in puzzle.cells.iter().zip(&solution.cells).enumerate() {
            let (row, col) = (index / size, index % size);
            if !(1..=size).contains(&value) {
                violations.push(Violation::ValueOutOfRange { row, col, value });
            } else if clue != 0 && clue != value {
                violations.push(Violation::ClueChanged { row, col, clue, value });
            }
        }

        for (unit, cells) in SudokuRules::grid_units(solution) {
            let duplicates = cells
                .iter()
                .map(|&cell| solution.cells[cell])
                .filter(|&value| value != 0)
                .duplicates()
                .sorted();
            for value in duplicates {
                violations.push(Violation::Duplicate {
                    unit: unit.clone(),
                    value,
                });
            }
        }

        if !violations.is_empty() {
            tracing::warn!(violations = violations.len(), "grid failed validation");
        }

        ValidationResult {
            is_valid: violations.is_empty(),
            violations,
            cells_checked: solution.cell_count(),
            validation_time_ms: start_time.elapsed().as_millis() as u64,
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::DimensionMismatch { puzzle, solution } => {
                write!(f, "Grid size mismatch: puzzle {}x{}, solution {}x{}", puzzle, puzzle, solution, solution)
            }
            Violation::ClueChanged { row, col, clue, value } => {
                write!(f, "Cell ({}, {}) should keep clue {} but holds {}", row, col, clue, value)
            }
            Violation::ValueOutOfRange { row, col, value } => {
                write!(f, "Cell ({}, {}) holds {} which is not a legal value", row, col, value)
            }
            Violation::Duplicate { unit, value } => {
                write!(f, "Value {} appears more than once in {}", value, unit)
            }
        }
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Result: {}", if self.is_valid { "VALID" } else { "INVALID" })?;
        writeln!(f, "Cells checked: {}", self.cells_checked)?;
        writeln!(f, "Violations: {}", self.violations.len())?;

        for violation in self.violations.iter().take(5) {
            writeln!(f, "  - {}", violation)?;
        }
        if self.violations.len() > 5 {
            writeln!(f, "  ... and {} more", self.violations.len() - 5)?;
        }

        Ok(())
    }
}
