//! Clause generation for the binary puzzle encoding

use super::codec::{encode_equals, encode_not_equals};
use super::VariableLayout;
use crate::error::GridError;
use crate::sudoku::{Grid, Relation, SudokuRules};
use itertools::Itertools;
use rayon::prelude::*;
use std::fmt;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// True if some literal of the clause appears in `model`
    pub fn is_satisfied_by(&self, model: &[i32]) -> bool {
        self.literals.iter().any(|&lit| {
            let index = lit.unsigned_abs() as usize - 1;
            model.get(index).is_some_and(|&assigned| assigned == lit)
        })
    }
}

/// DIMACS clause line: literals then the `0` terminator
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literals.is_empty() {
            write!(f, "0")
        } else {
            write!(f, "{} 0", self.literals.iter().join(" "))
        }
    }
}

/// Clause and variable totals, known before any clause is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseCounts {
    pub variables: usize,
    pub domain: usize,
    pub clue: usize,
    pub uniqueness: usize,
    pub row_pairs: usize,
    pub column_pairs: usize,
    pub block_pairs: usize,
}

impl ClauseCounts {
    /// Count clauses analytically from N, B, k and the number of clues
    pub fn for_grid(grid: &Grid, layout: &VariableLayout) -> Self {
        let size = grid.size;
        let cells = layout.cell_count();
        let pairs_per_line = size * size.saturating_sub(1) / 2;
        let row_pairs = size * pairs_per_line;
        let column_pairs = size * pairs_per_line;
        let block_pairs = cells * (grid.block_size - 1) * (grid.block_size - 1) / 2;
        debug_assert_eq!(
            row_pairs + column_pairs + block_pairs,
            cells * SudokuRules::peers_per_cell(size, grid.block_size) / 2
        );

        Self {
            variables: layout.variable_count(),
            domain: cells * layout.forbidden_code_count(),
            clue: grid.clue_count() * layout.bit_width(),
            uniqueness: (row_pairs + column_pairs + block_pairs) * size,
            row_pairs,
            column_pairs,
            block_pairs,
        }
    }

    pub fn peer_pairs(&self) -> usize {
        self.row_pairs + self.column_pairs + self.block_pairs
    }

    pub fn total(&self) -> usize {
        self.domain + self.clue + self.uniqueness
    }
}

/// Compiles a puzzle grid into CNF clauses over the binary cell encoding.
///
/// Cells are visited by increasing index; for each cell the domain
/// clauses come first, then the clue units, then uniqueness clauses for
/// every later peer cell and every value in `1..=N`. The order is stable
/// so repeated compilation yields identical output.
pub struct ConstraintCompiler {
    grid: Grid,
    layout: VariableLayout,
}

impl ConstraintCompiler {
    /// Create a compiler for a loaded grid
    pub fn new(grid: Grid) -> Result<Self, GridError> {
        let layout = VariableLayout::for_grid(&grid)?;
        Ok(Self { grid, layout })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> &VariableLayout {
        &self.layout
    }

    pub fn counts(&self) -> ClauseCounts {
        ClauseCounts::for_grid(&self.grid, &self.layout)
    }

    /// Forbid the codes of cell `cell` (1-based) that are not legal values
    pub fn domain_clauses(&self, cell: usize) -> impl Iterator<Item = Clause> {
        let group = self.layout.group(cell);
        self.layout
            .forbidden_codes()
            .map(move |code| Clause::new(encode_not_equals(&group, code)))
    }

    /// Unit clauses pinning a given cell to its clue; nothing for a blank cell
    pub fn clue_clauses(&self, cell: usize) -> impl Iterator<Item = Clause> {
        let value = self.grid.cells[cell - 1];
        let literals = if value == 0 {
            Vec::new()
        } else {
            encode_equals(&self.layout.group(cell), value)
        };
        literals.into_iter().map(Clause::unit)
    }

    /// One clause per value in `1..=N`, each false only when both cells hold that value
    pub fn uniqueness_clauses(&self, cell: usize, other: usize) -> impl Iterator<Item = Clause> {
        let left = self.layout.group(cell);
        let right = self.layout.group(other);
        (1..=self.layout.size()).map(move |value| {
            let mut literals = encode_not_equals(&left, value);
            literals.extend(encode_not_equals(&right, value));
            Clause::new(literals)
        })
    }

    /// Later cells (1-based, increasing) sharing a row, column or block with `cell`
    pub fn peers_after(&self, cell: usize) -> impl Iterator<Item = usize> {
        let size = self.grid.size;
        let block_size = self.grid.block_size;
        (cell + 1..=self.layout.cell_count())
            .filter(move |&other| SudokuRules::shared_units(size, block_size, cell - 1, other - 1).any())
    }

    /// Primary relation between two 1-based cells, if any
    pub fn relation(&self, cell: usize, other: usize) -> Option<Relation> {
        SudokuRules::shared_units(self.grid.size, self.grid.block_size, cell - 1, other - 1).relation()
    }

    /// Every clause contributed by one cell, in emission order
    pub fn cell_clauses(&self, cell: usize) -> impl Iterator<Item = Clause> + '_ {
        self.domain_clauses(cell)
            .chain(self.clue_clauses(cell))
            .chain(
                self.peers_after(cell)
                    .flat_map(move |other| self.uniqueness_clauses(cell, other)),
            )
    }

    /// Lazy stream of the whole formula
    pub fn clauses(&self) -> impl Iterator<Item = Clause> + '_ {
        (1..=self.layout.cell_count()).flat_map(move |cell| self.cell_clauses(cell))
    }

    /// Collect the whole formula sequentially
    pub fn compile(&self) -> Vec<Clause> {
        let clauses: Vec<Clause> = self.clauses().collect();
        tracing::debug!(clauses = clauses.len(), "compiled formula sequentially");
        clauses
    }

    /// Collect the whole formula with per-cell groups built on the rayon pool.
    ///
    /// Groups are concatenated in cell order, so the result equals [`compile`](Self::compile).
    pub fn compile_parallel(&self) -> Vec<Clause> {
        let groups: Vec<Vec<Clause>> = (1..=self.layout.cell_count())
            .into_par_iter()
            .map(|cell| self.cell_clauses(cell).collect())
            .collect();

        let clauses: Vec<Clause> = groups.into_iter().flatten().collect();
        tracing::debug!(clauses = clauses.len(), "compiled formula in parallel");
        clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_grid() -> Grid {
        Grid::from_rows(vec![
            vec![1, 0, 0, 4],
            vec![0, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![4, 0, 0, 1],
        ])
        .unwrap()
    }

    fn solved_grid() -> Grid {
        Grid::from_rows(vec![
            vec![1, 2, 3, 4],
            vec![3, 4, 1, 2],
            vec![2, 1, 4, 3],
            vec![4, 3, 2, 1],
        ])
        .unwrap()
    }

    /// Model setting each cell's bits to the grid's values
    fn model_for(grid: &Grid, layout: &VariableLayout) -> Vec<i32> {
        (1..=layout.cell_count())
            .flat_map(|cell| encode_equals(&layout.group(cell), grid.cells[cell - 1]))
            .collect()
    }

    #[test]
    fn test_clause_display() {
        assert_eq!(Clause::new(vec![1, -2, 3]).to_string(), "1 -2 3 0");
        assert_eq!(Clause::unit(-7).to_string(), "-7 0");
        assert_eq!(Clause::unit(1).literals, vec![1]);
        assert!(Clause::new(vec![]).is_empty());
    }

    #[test]
    fn test_domain_clauses() {
        let compiler = ConstraintCompiler::new(scenario_grid()).unwrap();
        let clauses: Vec<Clause> = compiler.domain_clauses(2).collect();
        // Cell 2 owns variables 4, 5, 6; forbidden codes 0, 5, 6, 7
        assert_eq!(
            clauses,
            vec![
                Clause::new(vec![4, 5, 6]),
                Clause::new(vec![-4, 5, -6]),
                Clause::new(vec![-4, -5, 6]),
                Clause::new(vec![-4, -5, -6]),
            ]
        );
    }

    #[test]
    fn test_clue_clauses() {
        let compiler = ConstraintCompiler::new(scenario_grid()).unwrap();
        // Cell 4 holds clue 4 = 100 over variables 10, 11, 12
        let clauses: Vec<Clause> = compiler.clue_clauses(4).collect();
        assert_eq!(clauses, vec![Clause::unit(10), Clause::unit(-11), Clause::unit(-12)]);
        assert_eq!(compiler.clue_clauses(2).count(), 0);
    }

    #[test]
    fn test_uniqueness_clauses() {
        let compiler = ConstraintCompiler::new(scenario_grid()).unwrap();
        let clauses: Vec<Clause> = compiler.uniqueness_clauses(1, 2).collect();
        assert_eq!(clauses.len(), 4);
        // value 1 = 001
        assert_eq!(clauses[0], Clause::new(vec![1, 2, -3, 4, 5, -6]));
        // value 4 = 100
        assert_eq!(clauses[3], Clause::new(vec![-1, 2, 3, -4, 5, 6]));
    }

    #[test]
    fn test_peers_cover_row_column_and_block() {
        let compiler = ConstraintCompiler::new(scenario_grid()).unwrap();
        // Cell 1 is (0,0): row 2,3,4; column 5,9,13; block-only 6
        assert_eq!(compiler.peers_after(1).collect::<Vec<_>>(), vec![2, 3, 4, 5, 6, 9, 13]);
        assert_eq!(compiler.relation(1, 2), Some(Relation::SameRow));
        assert_eq!(compiler.relation(1, 5), Some(Relation::SameColumn));
        assert_eq!(compiler.relation(1, 6), Some(Relation::SameBlock));
        assert_eq!(compiler.relation(1, 7), None);
        assert_eq!(compiler.peers_after(16).count(), 0);
    }

    #[test]
    fn test_counts_match_emitted_clauses() {
        let compiler = ConstraintCompiler::new(scenario_grid()).unwrap();
        let counts = compiler.counts();
        assert_eq!(counts.variables, 48);
        assert_eq!(counts.domain, 64);
        assert_eq!(counts.clue, 18);
        assert_eq!(counts.peer_pairs(), 56);
        assert_eq!(counts.uniqueness, 224);
        assert_eq!(counts.total(), 306);
        assert_eq!(compiler.clauses().count(), 306);

        for size in [1, 9, 16, 25] {
            let grid = Grid::new(size).unwrap();
            let compiler = ConstraintCompiler::new(grid).unwrap();
            assert_eq!(compiler.clauses().count(), compiler.counts().total(), "size {}", size);
        }

        // 625 * (32 - 25) domain clauses, 20000 peer pairs * 25 values
        let blank_25 = ConstraintCompiler::new(Grid::new(25).unwrap()).unwrap();
        assert_eq!(blank_25.counts().domain, 4375);
        assert_eq!(blank_25.counts().uniqueness, 500_000);
        assert_eq!(blank_25.counts().total(), 504_375);
    }

    #[test]
    fn test_every_peer_pair_forbids_every_shared_value() {
        let compiler = ConstraintCompiler::new(Grid::new(4).unwrap()).unwrap();
        let clauses = compiler.compile();
        let layout = *compiler.layout();

        for cell in 1..=16 {
            for other in cell + 1..=16 {
                for value in 1..=4 {
                    let mut expected = encode_not_equals(&layout.group(cell), value);
                    expected.extend(encode_not_equals(&layout.group(other), value));
                    let present = clauses.iter().any(|clause| clause.literals == expected);
                    assert_eq!(present, compiler.relation(cell, other).is_some());
                }
            }
        }
    }

    #[test]
    fn test_solution_satisfies_formula() {
        let compiler = ConstraintCompiler::new(scenario_grid()).unwrap();
        let model = model_for(&solved_grid(), compiler.layout());
        assert!(compiler.clauses().all(|clause| clause.is_satisfied_by(&model)));
    }

    #[test]
    fn test_violations_falsify_formula() {
        let compiler = ConstraintCompiler::new(scenario_grid()).unwrap();

        // Clue changed: cell (0,0) must be 1
        let mut wrong_clue = solved_grid();
        wrong_clue.cells.swap(0, 1);
        let model = model_for(&wrong_clue, compiler.layout());
        assert!(!compiler.clauses().all(|clause| clause.is_satisfied_by(&model)));

        // Duplicate in a block only: (0,1) and (1,0) both 2 in an otherwise arbitrary grid
        let mut duplicate = Grid::new(4).unwrap();
        duplicate.cells = vec![1, 2, 3, 4, 2, 3, 4, 1, 3, 4, 1, 2, 4, 1, 2, 3];
        let blank = ConstraintCompiler::new(Grid::new(4).unwrap()).unwrap();
        let model = model_for(&duplicate, blank.layout());
        assert!(!blank.clauses().all(|clause| clause.is_satisfied_by(&model)));

        // Blank left in a model: code 0 is forbidden
        let model = model_for(&Grid::new(4).unwrap(), blank.layout());
        assert!(!blank.domain_clauses(1).all(|clause| clause.is_satisfied_by(&model)));
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let compiler = ConstraintCompiler::new(scenario_grid()).unwrap();
        let first = compiler.compile();
        let second = compiler.compile();
        assert_eq!(first, second);
        assert_eq!(first, compiler.compile_parallel());

        let nine = ConstraintCompiler::new(Grid::new(9).unwrap()).unwrap();
        assert_eq!(nine.compile(), nine.compile_parallel());
    }
}
