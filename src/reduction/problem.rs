//! Puzzle reduction problem definition

use super::{Solution, SolutionValidator};
use crate::config::Settings;
use crate::sat::{ClauseCounts, EncodingStatistics, SatEncoder, SolverStatistics};
use crate::sudoku::{load_grid_from_file, Grid};
use anyhow::{Context, Result};
use std::path::Path;

/// A puzzle paired with the encoder configured to reduce it
pub struct SudokuProblem {
    settings: Settings,
    puzzle: Grid,
    encoder: SatEncoder,
    validator: SolutionValidator,
}

impl SudokuProblem {
    /// Create a new problem, loading the puzzle named in `settings`
    pub fn new(settings: Settings) -> Result<Self> {
        let puzzle = load_grid_from_file(&settings.input.puzzle_file, settings.input.format)
            .context("Failed to load puzzle file")?;
        Self::with_puzzle(settings, puzzle)
    }

    /// Create a problem with an explicit puzzle grid
    pub fn with_puzzle(settings: Settings, puzzle: Grid) -> Result<Self> {
        let encoder = SatEncoder::new(settings.clone(), &puzzle)?;

        Ok(Self {
            settings,
            puzzle,
            encoder,
            validator: SolutionValidator::new(),
        })
    }

    /// Write the DIMACS reduction of the puzzle to `path`
    pub fn write_formula(&self, path: &Path) -> Result<ClauseCounts> {
        self.encoder.write_formula(path)
    }

    /// Solve the puzzle; `None` when it has no completion
    pub fn solve(&mut self) -> Result<Option<Solution>> {
        tracing::info!(
            size = self.puzzle.size,
            clues = self.puzzle.clue_count(),
            backend = self.encoder.solver_name(),
            "solving puzzle"
        );

        let Some(grid) = self.encoder.solve().context("SAT solving failed")? else {
            tracing::info!("puzzle has no solution");
            return Ok(None);
        };

        let validation = self.validator.validate(&self.puzzle, &grid);
        if !validation.is_valid {
            anyhow::bail!("Decoded grid does not solve the puzzle:\n{}", validation);
        }
        tracing::debug!(
            "validated {} cells in {}ms",
            validation.cells_checked,
            validation.validation_time_ms
        );

        let solver_statistics = self.encoder.solver_statistics();
        Ok(Some(Solution::new(
            self.puzzle.clone(),
            grid,
            self.encoder.solver_name(),
            solver_statistics.solve_time,
            &self.encoder.statistics(),
        )))
    }

    pub fn puzzle(&self) -> &Grid {
        &self.puzzle
    }

    /// Get the problem settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get encoding statistics
    pub fn encoding_statistics(&self) -> EncodingStatistics {
        self.encoder.statistics()
    }

    /// Statistics of the last solver run
    pub fn solver_statistics(&self) -> SolverStatistics {
        self.encoder.solver_statistics()
    }
}
