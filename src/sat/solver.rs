//! SAT solver backends behind a single capability trait

use super::decoder::{parse_solver_output, Assignment, Verdict};
use super::writer::write_formula_to_file;
use super::ConstraintCompiler;
use anyhow::{Context, Result};
use cadical::Solver;
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

/// Something that can decide a compiled formula
pub trait SatBackend {
    /// Short human-readable backend name
    fn name(&self) -> &str;

    /// Decide the formula produced by `compiler`
    fn solve(&mut self, compiler: &ConstraintCompiler) -> Result<Verdict>;

    /// Statistics of the last call to [`solve`](SatBackend::solve)
    fn statistics(&self) -> SolverStatistics;
}

/// Statistics about the solving process
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
    pub solve_time: Duration,
    pub result: SolverResultType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverResultType {
    NotRun,
    Satisfiable,
    Unsatisfiable,
}

impl Default for SolverStatistics {
    fn default() -> Self {
        Self {
            variable_count: 0,
            clause_count: 0,
            solve_time: Duration::ZERO,
            result: SolverResultType::NotRun,
        }
    }
}

impl SolverStatistics {
    fn record(compiler: &ConstraintCompiler, solve_time: Duration, verdict: &Verdict) -> Self {
        let counts = compiler.counts();
        Self {
            variable_count: counts.variables,
            clause_count: counts.total(),
            solve_time,
            result: match verdict {
                Verdict::Satisfiable(_) => SolverResultType::Satisfiable,
                Verdict::Unsatisfiable => SolverResultType::Unsatisfiable,
            },
        }
    }
}

/// In-process CaDiCaL solver fed straight from the clause stream
#[derive(Debug, Default)]
pub struct CadicalBackend {
    statistics: SolverStatistics,
}

impl CadicalBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SatBackend for CadicalBackend {
    fn name(&self) -> &str {
        "cadical"
    }

    fn solve(&mut self, compiler: &ConstraintCompiler) -> Result<Verdict> {
        let start_time = Instant::now();
        let mut solver: Solver = Solver::new();

        for clause in compiler.clauses() {
            if clause.is_empty() {
                anyhow::bail!("Cannot add empty clause (unsatisfiable)");
            }
            solver.add_clause(clause.literals.iter().copied());
        }

        let verdict = match solver.solve() {
            Some(true) => {
                let variables = compiler.layout().variable_count() as i32;
                let values: Vec<bool> = (1..=variables)
                    .map(|var| solver.value(var).unwrap_or(false))
                    .collect();
                Verdict::Satisfiable(Assignment::from_values(&values))
            }
            Some(false) => Verdict::Unsatisfiable,
            None => anyhow::bail!("CaDiCaL stopped without deciding the formula"),
        };

        self.statistics = SolverStatistics::record(compiler, start_time.elapsed(), &verdict);
        tracing::info!(
            backend = self.name(),
            satisfiable = matches!(verdict, Verdict::Satisfiable(_)),
            "solver finished in {:.3}s",
            self.statistics.solve_time.as_secs_f64()
        );
        Ok(verdict)
    }

    fn statistics(&self) -> SolverStatistics {
        self.statistics.clone()
    }
}

/// Runs a solver executable on a DIMACS file, e.g. `minisat {input} {output}`
#[derive(Debug)]
pub struct ExternalBackend {
    command: String,
    args: Vec<String>,
    formula_path: PathBuf,
    result_path: PathBuf,
    parallel: bool,
    statistics: SolverStatistics,
}

impl ExternalBackend {
    pub fn new(
        command: impl Into<String>,
        args: Vec<String>,
        formula_path: PathBuf,
        result_path: PathBuf,
    ) -> Self {
        Self {
            command: command.into(),
            args,
            formula_path,
            result_path,
            parallel: false,
            statistics: SolverStatistics::default(),
        }
    }

    /// Compile clause groups on the rayon pool before writing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Arguments with `{input}` and `{output}` substituted
    pub fn resolved_args(&self) -> Vec<String> {
        let input = self.formula_path.display().to_string();
        let output = self.result_path.display().to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{output}", &output))
            .collect()
    }

    fn writes_result_file(&self) -> bool {
        self.args.iter().any(|arg| arg.contains("{output}"))
    }
}

impl SatBackend for ExternalBackend {
    fn name(&self) -> &str {
        &self.command
    }

    fn solve(&mut self, compiler: &ConstraintCompiler) -> Result<Verdict> {
        if self.writes_result_file() {
            if self.result_path == self.formula_path {
                anyhow::bail!(
                    "Solver result file {} would overwrite the formula",
                    self.result_path.display()
                );
            }
            if self.result_path.exists() {
                std::fs::remove_file(&self.result_path).with_context(|| {
                    format!("Failed to remove stale result file {}", self.result_path.display())
                })?;
            }
        }

        let counts = compiler.counts();
        if self.parallel {
            write_formula_to_file(&self.formula_path, &counts, compiler.compile_parallel())
        } else {
            write_formula_to_file(&self.formula_path, &counts, compiler.clauses())
        }
        .with_context(|| format!("Failed to write formula to {}", self.formula_path.display()))?;

        let args = self.resolved_args();
        tracing::info!(command = %self.command, ?args, "running external solver");

        let start_time = Instant::now();
        let output = Command::new(&self.command)
            .args(&args)
            .output()
            .with_context(|| format!("Failed to run solver '{}'", self.command))?;
        let solve_time = start_time.elapsed();

        // MiniSat-style solvers exit with 10 (SAT) or 20 (UNSAT), so the status alone says little
        tracing::debug!(status = ?output.status, "external solver exited");

        let text = if self.writes_result_file() {
            std::fs::read_to_string(&self.result_path).with_context(|| {
                format!(
                    "Solver '{}' produced no result file {} (status {}): {}",
                    self.command,
                    self.result_path.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                )
            })?
        } else {
            String::from_utf8_lossy(&output.stdout).into_owned()
        };

        let verdict = parse_solver_output(&text)
            .with_context(|| format!("Failed to parse output of solver '{}'", self.command))?;

        self.statistics = SolverStatistics::record(compiler, solve_time, &verdict);
        Ok(verdict)
    }

    fn statistics(&self) -> SolverStatistics {
        self.statistics.clone()
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        writeln!(f, "  Result: {:?}", self.result)?;
        Ok(())
    }
}
