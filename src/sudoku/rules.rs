//! Row, column and block geometry of the puzzle

use super::Grid;

/// Why two distinct cells must hold different values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    SameRow,
    SameColumn,
    /// Same block but neither the same row nor the same column
    SameBlock,
}

/// Which constraint units two cells have in common
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SharedUnits {
    pub row: bool,
    pub column: bool,
    pub block: bool,
}

impl SharedUnits {
    pub fn any(&self) -> bool {
        self.row || self.column || self.block
    }

    /// Primary relation, reported as row, then column, then block
    pub fn relation(&self) -> Option<Relation> {
        if self.row {
            Some(Relation::SameRow)
        } else if self.column {
            Some(Relation::SameColumn)
        } else if self.block {
            Some(Relation::SameBlock)
        } else {
            None
        }
    }
}

/// Geometry rules for an N x N puzzle with B x B blocks
pub struct SudokuRules;

impl SudokuRules {
    /// `(row, col, block)` of a 0-based cell index, with blocks numbered row-major
    pub fn coordinates(size: usize, block_size: usize, cell: usize) -> (usize, usize, usize) {
        let row = cell / size;
        let col = cell % size;
        let block = (row / block_size) * block_size + col / block_size;
        (row, col, block)
    }

    /// Units shared by two 0-based cell indices.
    ///
    /// Each unit is tested on its own; a pair in the same row and block
    /// reports both.
    pub fn shared_units(size: usize, block_size: usize, a: usize, b: usize) -> SharedUnits {
        if a == b {
            return SharedUnits::default();
        }
        let (row_a, col_a, block_a) = Self::coordinates(size, block_size, a);
        let (row_b, col_b, block_b) = Self::coordinates(size, block_size, b);
        let shared = SharedUnits {
            row: row_a == row_b,
            column: col_a == col_b,
            block: block_a == block_b,
        };
        debug_assert!(!(shared.row && shared.column), "distinct cells {} and {} share row and column", a, b);
        shared
    }

    /// Number of cells sharing at least one unit with any given cell
    pub fn peers_per_cell(size: usize, block_size: usize) -> usize {
        let off_line_block_cells = (block_size - 1) * (block_size - 1);
        2 * (size - 1) + off_line_block_cells
    }

    /// 0-based cell indices of every row, column and block, labelled
    pub fn units(size: usize, block_size: usize) -> Vec<(String, Vec<usize>)> {
        let mut units = Vec::with_capacity(3 * size);

        for row in 0..size {
            units.push((format!("row {}", row + 1), (0..size).map(|col| row * size + col).collect()));
        }
        for col in 0..size {
            units.push((format!("column {}", col + 1), (0..size).map(|row| row * size + col).collect()));
        }
        for block in 0..size {
            let top = (block / block_size) * block_size;
            let left = (block % block_size) * block_size;
            let cells = (0..size)
                .map(|k| (top + k / block_size) * size + left + k % block_size)
                .collect();
            units.push((format!("block {}", block + 1), cells));
        }

        units
    }

    /// Units of a concrete grid
    pub fn grid_units(grid: &Grid) -> Vec<(String, Vec<usize>)> {
        Self::units(grid.size, grid.block_size)
    }
}
