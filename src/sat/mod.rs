//! SAT reduction components: encoding, clause generation, DIMACS output and decoding

pub mod codec;
pub mod variables;
pub mod constraints;
pub mod writer;
pub mod decoder;
pub mod solver;
pub mod solver_factory;
pub mod encoder;

pub use variables::{bit_width, VariableLayout};
pub use constraints::{Clause, ClauseCounts, ConstraintCompiler};
pub use writer::{write_formula, write_formula_to_file, FormulaWriter};
pub use decoder::{parse_solver_output, Assignment, SolutionDecoder, Verdict};
pub use solver::{CadicalBackend, ExternalBackend, SatBackend, SolverStatistics};
pub use solver_factory::UnifiedSatSolver;
pub use encoder::{EncodingStatistics, SatEncoder};
