//! Configuration settings for the puzzle-to-CNF reduction

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub input: InputConfig,
    pub encoding: EncodingConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub puzzle_file: PathBuf,
    pub format: GridFormat,
}

/// How rows of an input grid are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GridFormat {
    Auto,
    /// One character per cell, e.g. `530070000`
    Digits,
    /// Whitespace-separated integers, needed once N > 9
    Whitespace,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Program run by the external backend
    pub command: String,
    /// Arguments; `{input}` and `{output}` are replaced by the formula and result paths
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    Cadical,
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub formula_file: PathBuf,
    pub assignment_file: PathBuf,
    pub solution_file: PathBuf,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: InputConfig {
                puzzle_file: PathBuf::from("input/puzzles/sudoku_9x9.txt"),
                format: GridFormat::Auto,
            },
            encoding: EncodingConfig { parallel: false },
            solver: SolverConfig {
                backend: SolverBackend::Cadical,
                command: "minisat".to_string(),
                args: vec!["{input}".to_string(), "{output}".to_string()],
            },
            output: OutputConfig {
                formula_file: PathBuf::from("output/sudoku.cnf"),
                assignment_file: PathBuf::from("output/assignment.txt"),
                solution_file: PathBuf::from("output/solution.txt"),
                format: OutputFormat::Text,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Load settings from `path` if it exists, otherwise fall back to defaults
    pub fn from_file_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::warn!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if !self.input.puzzle_file.exists() {
            anyhow::bail!("Puzzle file does not exist: {}", self.input.puzzle_file.display());
        }

        if self.solver.backend == SolverBackend::External {
            if self.solver.command.trim().is_empty() {
                anyhow::bail!("External solver backend needs a command");
            }
            if !self.solver.args.iter().any(|arg| arg.contains("{input}")) {
                anyhow::bail!("External solver arguments must reference {{input}}");
            }
        }

        if self.output.formula_file == self.output.solution_file {
            anyhow::bail!(
                "Formula and solution files must differ: {}",
                self.output.formula_file.display()
            );
        }

        if self.output.assignment_file == self.output.formula_file {
            anyhow::bail!(
                "Assignment and formula files must differ: {}",
                self.output.assignment_file.display()
            );
        }

        if self.output.assignment_file == self.output.solution_file {
            anyhow::bail!(
                "Assignment and solution files must differ: {}",
                self.output.assignment_file.display()
            );
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref puzzle_file) = cli_overrides.puzzle_file {
            self.input.puzzle_file = puzzle_file.clone();
        }
        if let Some(format) = cli_overrides.input_format {
            self.input.format = format;
        }
        if let Some(backend) = cli_overrides.backend {
            self.solver.backend = backend;
        }
        if let Some(ref command) = cli_overrides.solver_command {
            self.solver.command = command.clone();
        }
        if cli_overrides.parallel {
            self.encoding.parallel = true;
        }
        if let Some(ref formula_file) = cli_overrides.formula_file {
            self.output.formula_file = formula_file.clone();
        }
        if let Some(ref solution_file) = cli_overrides.solution_file {
            self.output.solution_file = solution_file.clone();
        }
        if let Some(format) = cli_overrides.output_format {
            self.output.format = format;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub puzzle_file: Option<PathBuf>,
    pub input_format: Option<GridFormat>,
    pub backend: Option<SolverBackend>,
    pub solver_command: Option<String>,
    pub parallel: bool,
    pub formula_file: Option<PathBuf>,
    pub solution_file: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.solver.backend = SolverBackend::External;
        settings.input.format = GridFormat::Whitespace;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.solver.backend, SolverBackend::External);
        assert_eq!(loaded.input.format, GridFormat::Whitespace);
        assert_eq!(loaded.solver.args, vec!["{input}", "{output}"]);
    }

    #[test]
    fn test_validate() {
        let temp_dir = tempdir().unwrap();
        let puzzle = temp_dir.path().join("puzzle.txt");
        std::fs::write(&puzzle, "1004\n0010\n0100\n4001\n").unwrap();

        let mut settings = Settings::default();
        assert!(settings.validate().is_err());

        settings.input.puzzle_file = puzzle;
        assert!(settings.validate().is_ok());

        settings.solver.backend = SolverBackend::External;
        settings.solver.args = vec!["-verb=0".to_string()];
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_shared_output_paths() {
        let temp_dir = tempdir().unwrap();
        let puzzle = temp_dir.path().join("puzzle.txt");
        std::fs::write(&puzzle, "1004\n0010\n0100\n4001\n").unwrap();

        let mut settings = Settings::default();
        settings.input.puzzle_file = puzzle;
        settings.solver.backend = SolverBackend::External;
        assert!(settings.validate().is_ok());

        let shared = temp_dir.path().join("same.cnf");
        settings.output.formula_file = shared.clone();
        settings.output.assignment_file = shared.clone();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("Assignment and formula files must differ"));

        settings.output.formula_file = temp_dir.path().join("sudoku.cnf");
        settings.output.solution_file = shared;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("Assignment and solution files must differ"));
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            puzzle_file: Some(PathBuf::from("p.txt")),
            backend: Some(SolverBackend::External),
            parallel: true,
            output_format: Some(OutputFormat::Json),
            ..Default::default()
        };
        settings.merge_with_cli(&overrides);

        assert_eq!(settings.input.puzzle_file, PathBuf::from("p.txt"));
        assert_eq!(settings.solver.backend, SolverBackend::External);
        assert!(settings.encoding.parallel);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert_eq!(settings.output.formula_file, PathBuf::from("output/sudoku.cnf"));
    }
}
