//! Factory for creating SAT solver instances based on configuration

use super::decoder::Verdict;
use super::solver::{CadicalBackend, ExternalBackend, SatBackend, SolverStatistics};
use super::ConstraintCompiler;
use crate::config::{Settings, SolverBackend};
use anyhow::Result;

/// Unified SAT solver interface that can use different backends
#[derive(Debug)]
pub enum UnifiedSatSolver {
    Cadical(CadicalBackend),
    External(ExternalBackend),
}

impl UnifiedSatSolver {
    /// Create a new solver instance based on the configured backend
    pub fn from_settings(settings: &Settings) -> Self {
        match settings.solver.backend {
            SolverBackend::Cadical => UnifiedSatSolver::Cadical(CadicalBackend::new()),
            SolverBackend::External => UnifiedSatSolver::External(
                ExternalBackend::new(
                    settings.solver.command.clone(),
                    settings.solver.args.clone(),
                    settings.output.formula_file.clone(),
                    settings.output.assignment_file.clone(),
                )
                .with_parallel(settings.encoding.parallel),
            ),
        }
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedSatSolver::Cadical(_) => SolverBackend::Cadical,
            UnifiedSatSolver::External(_) => SolverBackend::External,
        }
    }
}

impl SatBackend for UnifiedSatSolver {
    fn name(&self) -> &str {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.name(),
            UnifiedSatSolver::External(solver) => solver.name(),
        }
    }

    fn solve(&mut self, compiler: &ConstraintCompiler) -> Result<Verdict> {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.solve(compiler),
            UnifiedSatSolver::External(solver) => solver.solve(compiler),
        }
    }

    fn statistics(&self) -> SolverStatistics {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.statistics(),
            UnifiedSatSolver::External(solver) => solver.statistics(),
        }
    }
}

impl Default for UnifiedSatSolver {
    fn default() -> Self {
        UnifiedSatSolver::Cadical(CadicalBackend::new())
    }
}
