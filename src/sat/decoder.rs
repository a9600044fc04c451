//! Solver output parsing and the inverse of the binary cell encoding

use super::codec::{decode_value, encode_equals};
use super::VariableLayout;
use crate::error::{DecodeError, GridError};
use crate::sudoku::Grid;

/// Outcome reported by a SAT solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Satisfiable(Assignment),
    Unsatisfiable,
}

/// A model as a flat list of literals, one per variable in variable-id order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    pub literals: Vec<i32>,
}

impl Assignment {
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Build from truth values of variables `1..=values.len()`
    pub fn from_values(values: &[bool]) -> Self {
        let literals = values
            .iter()
            .zip(1..)
            .map(|(&value, var): (&bool, i32)| if value { var } else { -var })
            .collect();
        Self { literals }
    }

    /// The assignment that sets every cell group of `layout` to the grid's value
    pub fn for_grid(grid: &Grid, layout: &VariableLayout) -> Self {
        let literals = (1..=layout.cell_count())
            .flat_map(|cell| encode_equals(&layout.group(cell), grid.cells[cell - 1]))
            .collect();
        Self { literals }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// Parse the text a solver wrote for a formula.
///
/// Accepts the MiniSat result layout (`SAT` / `UNSAT` / `INDET` on the
/// first line, then literals terminated by `0`) and the competition
/// layout (`s SATISFIABLE`, `v` lines, `c` comments).
pub fn parse_solver_output(text: &str) -> Result<Verdict, DecodeError> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('c'));

    let marker = lines.next().ok_or(DecodeError::MissingMarker)?;
    match marker {
        "SAT" | "SATISFIABLE" | "s SATISFIABLE" => {}
        "UNSAT" | "UNSATISFIABLE" | "s UNSATISFIABLE" => return Ok(Verdict::Unsatisfiable),
        "INDET" | "UNKNOWN" | "s UNKNOWN" => {
            return Err(DecodeError::Indeterminate(marker.to_string()))
        }
        other => return Err(DecodeError::UnexpectedMarker(other.to_string())),
    }

    let mut literals = Vec::new();
    for line in lines {
        let body = line.strip_prefix('v').unwrap_or(line);
        for token in body.split_whitespace() {
            let literal: i32 = token
                .parse()
                .map_err(|_| DecodeError::InvalidLiteral(token.to_string()))?;
            if literal != 0 {
                literals.push(literal);
            }
        }
    }

    Ok(Verdict::Satisfiable(Assignment::new(literals)))
}

/// Rebuilds a solved grid from a model of the compiled formula
#[derive(Debug, Clone)]
pub struct SolutionDecoder {
    layout: VariableLayout,
    template: Grid,
}

impl SolutionDecoder {
    /// Decoder for an N x N grid
    pub fn new(size: usize) -> Result<Self, GridError> {
        Ok(Self {
            layout: VariableLayout::new(size)?,
            template: Grid::new(size)?,
        })
    }

    pub fn layout(&self) -> &VariableLayout {
        &self.layout
    }

    /// Group the literals `k` at a time and read each group back as a cell value
    pub fn decode(&self, assignment: &Assignment) -> Result<Grid, DecodeError> {
        let width = self.layout.bit_width();
        let count = assignment.len();

        if count % width != 0 {
            return Err(DecodeError::NotMultipleOfWidth { count, width });
        }
        let expected = self.layout.variable_count();
        if count != expected {
            return Err(DecodeError::LengthMismatch {
                expected,
                actual: count,
            });
        }

        for (position, &literal) in assignment.literals.iter().enumerate() {
            if literal.unsigned_abs() as usize != position + 1 {
                return Err(DecodeError::OutOfOrder { position, literal });
            }
        }

        let size = self.layout.size();
        let mut grid = self.template.clone();
        for (index, group) in assignment.literals.chunks_exact(width).enumerate() {
            let value = decode_value(group);
            if !(1..=size).contains(&value) {
                return Err(DecodeError::ValueOutOfRange {
                    cell: index + 1,
                    value,
                    max: size,
                });
            }
            grid.cells[index] = value;
        }

        Ok(grid)
    }

    /// Parse solver text and decode it; `None` when the instance is unsatisfiable
    pub fn decode_output(&self, text: &str) -> Result<Option<Grid>, DecodeError> {
        match parse_solver_output(text)? {
            Verdict::Satisfiable(assignment) => self.decode(&assignment).map(Some),
            Verdict::Unsatisfiable => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved_grid() -> Grid {
        Grid::from_rows(vec![
            vec![1, 2, 3, 4],
            vec![3, 4, 1, 2],
            vec![2, 1, 4, 3],
            vec![4, 3, 2, 1],
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_minisat_output() {
        let verdict = parse_solver_output("SAT\n-1 2 -3 4 0\n").unwrap();
        assert_eq!(verdict, Verdict::Satisfiable(Assignment::new(vec![-1, 2, -3, 4])));

        assert_eq!(parse_solver_output("UNSAT\n").unwrap(), Verdict::Unsatisfiable);
    }

    #[test]
    fn test_parse_competition_output() {
        let text = "c comment\ns SATISFIABLE\nv 1 -2\nv -3 4 0\n";
        let verdict = parse_solver_output(text).unwrap();
        assert_eq!(verdict, Verdict::Satisfiable(Assignment::new(vec![1, -2, -3, 4])));

        assert_eq!(parse_solver_output("s UNSATISFIABLE\n").unwrap(), Verdict::Unsatisfiable);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_solver_output(""), Err(DecodeError::MissingMarker));
        assert_eq!(
            parse_solver_output("INDET\n"),
            Err(DecodeError::Indeterminate("INDET".to_string()))
        );
        assert_eq!(
            parse_solver_output("MAYBE\n1 2 0\n"),
            Err(DecodeError::UnexpectedMarker("MAYBE".to_string()))
        );
        assert_eq!(
            parse_solver_output("SAT\n1 x 0\n"),
            Err(DecodeError::InvalidLiteral("x".to_string()))
        );
    }

    #[test]
    fn test_round_trip_solved_grid() {
        let decoder = SolutionDecoder::new(4).unwrap();
        let grid = solved_grid();
        let assignment = Assignment::for_grid(&grid, decoder.layout());
        assert_eq!(assignment.len(), 48);
        assert_eq!(decoder.decode(&assignment).unwrap(), grid);
    }

    #[test]
    fn test_decode_output_text() {
        let decoder = SolutionDecoder::new(4).unwrap();
        let grid = solved_grid();
        let literals = Assignment::for_grid(&grid, decoder.layout()).literals;
        let body: Vec<String> = literals.iter().map(|lit| lit.to_string()).collect();
        let text = format!("SAT\n{} 0\n", body.join(" "));

        assert_eq!(decoder.decode_output(&text).unwrap(), Some(grid));
        assert_eq!(decoder.decode_output("UNSAT\n").unwrap(), None);
    }

    #[test]
    fn test_from_values() {
        let assignment = Assignment::from_values(&[true, false, false, true]);
        assert_eq!(assignment.literals, vec![1, -2, -3, 4]);
    }

    #[test]
    fn test_malformed_assignments() {
        let decoder = SolutionDecoder::new(4).unwrap();

        let short = Assignment::new((1..=47).collect());
        assert_eq!(
            decoder.decode(&short),
            Err(DecodeError::NotMultipleOfWidth { count: 47, width: 3 })
        );

        let truncated = Assignment::new((1..=45).collect());
        assert_eq!(
            decoder.decode(&truncated),
            Err(DecodeError::LengthMismatch { expected: 48, actual: 45 })
        );

        let mut shuffled = Assignment::for_grid(&solved_grid(), decoder.layout());
        shuffled.literals.swap(0, 1);
        assert!(matches!(decoder.decode(&shuffled), Err(DecodeError::OutOfOrder { position: 0, .. })));

        // every bit false decodes to the blank code 0
        let blank = Assignment::new((1..=48).map(|var| -var).collect());
        assert_eq!(
            decoder.decode(&blank),
            Err(DecodeError::ValueOutOfRange { cell: 1, value: 0, max: 4 })
        );
    }
}
