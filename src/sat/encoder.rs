//! SAT encoder tying the compiler, a solver backend and the decoder together

use super::constraints::ClauseCounts;
use super::decoder::{SolutionDecoder, Verdict};
use super::solver::{SatBackend, SolverStatistics};
use super::writer::write_formula_to_file;
use super::{ConstraintCompiler, UnifiedSatSolver};
use crate::config::Settings;
use crate::sudoku::Grid;
use anyhow::{Context, Result};
use std::path::Path;

/// Main SAT encoder for puzzle grids
pub struct SatEncoder {
    settings: Settings,
    compiler: ConstraintCompiler,
    decoder: SolutionDecoder,
    solver: UnifiedSatSolver,
}

impl SatEncoder {
    /// Create a new SAT encoder with the given settings and puzzle
    pub fn new(settings: Settings, puzzle: &Grid) -> Result<Self> {
        let compiler = ConstraintCompiler::new(puzzle.clone())
            .context("Puzzle cannot be encoded")?;
        let decoder = SolutionDecoder::new(puzzle.size).context("Puzzle cannot be decoded")?;
        let solver = UnifiedSatSolver::from_settings(&settings);

        Ok(Self {
            settings,
            compiler,
            decoder,
            solver,
        })
    }

    pub fn compiler(&self) -> &ConstraintCompiler {
        &self.compiler
    }

    pub fn decoder(&self) -> &SolutionDecoder {
        &self.decoder
    }

    /// Write the DIMACS formula to `path`
    pub fn write_formula(&self, path: &Path) -> Result<ClauseCounts> {
        let counts = self.compiler.counts();
        tracing::info!(
            variables = counts.variables,
            clauses = counts.total(),
            parallel = self.settings.encoding.parallel,
            "encoding {}x{} puzzle",
            self.compiler.grid().size,
            self.compiler.grid().size
        );

        if self.settings.encoding.parallel {
            write_formula_to_file(path, &counts, self.compiler.compile_parallel())
        } else {
            write_formula_to_file(path, &counts, self.compiler.clauses())
        }
        .with_context(|| format!("Failed to write formula to {}", path.display()))?;

        Ok(counts)
    }

    /// Solve with the configured backend; `None` when the puzzle has no solution
    pub fn solve(&mut self) -> Result<Option<Grid>> {
        let verdict = self
            .solver
            .solve(&self.compiler)
            .with_context(|| format!("Solver '{}' failed", self.solver.name()))?;

        match verdict {
            Verdict::Satisfiable(assignment) => {
                let grid = self
                    .decoder
                    .decode(&assignment)
                    .context("Failed to decode solver model")?;
                Ok(Some(grid))
            }
            Verdict::Unsatisfiable => {
                tracing::info!("formula is unsatisfiable");
                Ok(None)
            }
        }
    }

    /// Name of the configured solver backend
    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    pub fn solver_statistics(&self) -> SolverStatistics {
        self.solver.statistics()
    }

    /// Get encoding statistics
    pub fn statistics(&self) -> EncodingStatistics {
        let grid = self.compiler.grid();
        EncodingStatistics {
            size: grid.size,
            block_size: grid.block_size,
            bit_width: self.compiler.layout().bit_width(),
            clues: grid.clue_count(),
            counts: self.compiler.counts(),
        }
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub size: usize,
    pub block_size: usize,
    pub bit_width: usize,
    pub clues: usize,
    pub counts: ClauseCounts,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Grid: {}x{} ({}x{} blocks)", self.size, self.size, self.block_size, self.block_size)?;
        writeln!(f, "  Clues: {}", self.clues)?;
        writeln!(f, "  Bits per cell: {}", self.bit_width)?;
        writeln!(f, "  Variables: {}", self.counts.variables)?;
        writeln!(f, "  Domain clauses: {}", self.counts.domain)?;
        writeln!(f, "  Clue clauses: {}", self.counts.clue)?;
        writeln!(
            f,
            "  Uniqueness clauses: {} ({} row, {} column, {} block-only pairs)",
            self.counts.uniqueness, self.counts.row_pairs, self.counts.column_pairs, self.counts.block_pairs
        )?;
        writeln!(f, "  Total clauses: {}", self.counts.total())?;
        Ok(())
    }
}
