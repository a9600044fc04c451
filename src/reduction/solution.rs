//! Solved puzzle together with how it was obtained

use crate::config::OutputFormat;
use crate::sat::EncodingStatistics;
use crate::sudoku::{save_grid_to_file, write_atomically, Grid};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A decoded and validated completion of a puzzle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The puzzle as given, with blanks
    pub puzzle: Grid,
    /// The completed grid
    pub grid: Grid,
    /// Name of the solver backend that produced the model
    pub backend: String,
    /// Time spent inside the solver
    #[serde(skip)]
    pub solve_time: Duration,
    pub metadata: SolutionMetadata,
}

/// Size of the formula the solution was decoded from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionMetadata {
    pub clues: usize,
    pub filled_cells: usize,
    pub bit_width: usize,
    pub variables: usize,
    pub clauses: usize,
}

impl Solution {
    pub fn new(
        puzzle: Grid,
        grid: Grid,
        backend: impl Into<String>,
        solve_time: Duration,
        statistics: &EncodingStatistics,
    ) -> Self {
        let metadata = SolutionMetadata {
            clues: puzzle.clue_count(),
            filled_cells: grid.cell_count() - puzzle.clue_count(),
            bit_width: statistics.bit_width,
            variables: statistics.counts.variables,
            clauses: statistics.counts.total(),
        };

        Self {
            puzzle,
            grid,
            backend: backend.into(),
            solve_time,
            metadata,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file; `Text` writes only the completed grid rows
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();
        match format {
            OutputFormat::Text => save_grid_to_file(&self.grid, path),
            OutputFormat::Json => {
                let json = self.to_json()?;
                write_atomically(path, json.as_bytes())
                    .with_context(|| format!("Failed to write solution to {}", path.display()))
            }
        }
    }

    /// Load a solution previously saved as JSON
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read solution file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse solution file: {}", path.display()))
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({}x{}, {}):", self.grid.size, self.grid.size, self.backend)?;
        writeln!(
            f,
            "  {} clues, {} cells filled in {:.3}s",
            self.metadata.clues,
            self.metadata.filled_cells,
            self.solve_time.as_secs_f64()
        )?;
        writeln!(
            f,
            "  Formula: {} variables, {} clauses",
            self.metadata.variables, self.metadata.clauses
        )?;
        write!(f, "{}", self.grid)
    }
}
