//! N x N puzzle grid with sqrt(N) x sqrt(N) blocks

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A square grid of values in `0..=size`, where `0` marks a blank cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredGrid")]
pub struct Grid {
    pub size: usize,
    pub block_size: usize,
    pub cells: Vec<usize>,
}

impl Grid {
    /// Create a blank grid of the given size
    pub fn new(size: usize) -> Result<Self, GridError> {
        let block_size = block_size_for(size)?;
        Ok(Self {
            size,
            block_size,
            cells: vec![0; size * size],
        })
    }

    /// Create a grid from rows, checking shape and value range
    pub fn from_rows(rows: Vec<Vec<usize>>) -> Result<Self, GridError> {
        if rows.is_empty() {
            return Err(GridError::Empty);
        }

        let size = rows.len();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    actual: values.len(),
                    expected: size,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if value > size {
                    return Err(GridError::ValueOutOfRange {
                        row,
                        col,
                        value,
                        max: size,
                    });
                }
            }
        }

        let block_size = block_size_for(size)?;

        Ok(Self {
            size,
            block_size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Convert 2D coordinates to the 0-based row-major index
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Get the value at coordinates
    pub fn get(&self, row: usize, col: usize) -> usize {
        self.cells[self.index(row, col)]
    }

    /// Set the value at coordinates
    pub fn set(&mut self, row: usize, col: usize, value: usize) -> Result<(), GridError> {
        if row >= self.size || col >= self.size || value > self.size {
            return Err(GridError::ValueOutOfRange {
                row,
                col,
                value,
                max: self.size,
            });
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of given (non-blank) cells
    pub fn clue_count(&self) -> usize {
        self.cells.iter().filter(|&&value| value != 0).count()
    }

    /// True when no cell is blank
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&value| value != 0)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.cells.chunks(self.size)
    }
}

/// Serialized shape of a [`Grid`], checked by `from_rows` before use
#[derive(Deserialize)]
struct StoredGrid {
    size: usize,
    block_size: usize,
    cells: Vec<usize>,
}

impl TryFrom<StoredGrid> for Grid {
    type Error = GridError;

    fn try_from(stored: StoredGrid) -> Result<Self, Self::Error> {
        if stored.size == 0 {
            return Err(GridError::Empty);
        }
        let rows: Vec<Vec<usize>> = stored.cells.chunks(stored.size).map(<[usize]>::to_vec).collect();
        if rows.len() != stored.size {
            return Err(GridError::CellCount {
                size: stored.size,
                actual: stored.cells.len(),
            });
        }

        let grid = Self::from_rows(rows)?;
        if grid.block_size != stored.block_size {
            return Err(GridError::BlockSizeMismatch {
                size: grid.size,
                block_size: stored.block_size,
            });
        }
        Ok(grid)
    }
}

/// Block size `B` with `B * B == size`, or an error when none exists
pub fn block_size_for(size: usize) -> Result<usize, GridError> {
    if size == 0 {
        return Err(GridError::Empty);
    }
    let root = (size as f64).sqrt() as usize;
    (root.saturating_sub(1)..=root + 1)
        .find(|&b| b * b == size)
        .ok_or(GridError::NoBlockSize(size))
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (col, value) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(9).unwrap();
        assert_eq!(grid.size, 9);
        assert_eq!(grid.block_size, 3);
        assert_eq!(grid.cell_count(), 81);
        assert_eq!(grid.clue_count(), 0);
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows(vec![
            vec![1, 0, 0, 4],
            vec![0, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![4, 0, 0, 1],
        ])
        .unwrap();
        assert_eq!(grid.block_size, 2);
        assert_eq!(grid.clue_count(), 6);
        assert_eq!(grid.get(0, 3), 4);
        assert_eq!(grid.get(3, 0), 4);
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_block_sizes() {
        assert_eq!(block_size_for(1), Ok(1));
        assert_eq!(block_size_for(4), Ok(2));
        assert_eq!(block_size_for(9), Ok(3));
        assert_eq!(block_size_for(16), Ok(4));
        assert_eq!(block_size_for(25), Ok(5));
        assert_eq!(block_size_for(6), Err(GridError::NoBlockSize(6)));
        assert_eq!(block_size_for(0), Err(GridError::Empty));
    }

    #[test]
    fn test_malformed_grids() {
        assert_eq!(Grid::from_rows(vec![]), Err(GridError::Empty));

        let ragged = Grid::from_rows(vec![vec![1, 2], vec![3]]);
        assert!(matches!(ragged, Err(GridError::NotSquare { row: 1, .. })));

        let not_square_size = Grid::from_rows(vec![vec![0; 2]; 2]);
        assert_eq!(not_square_size, Err(GridError::NoBlockSize(2)));

        let too_big = Grid::from_rows(vec![
            vec![5, 0, 0, 0],
            vec![0; 4],
            vec![0; 4],
            vec![0; 4],
        ]);
        assert!(matches!(too_big, Err(GridError::ValueOutOfRange { value: 5, .. })));
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let grid: Grid = serde_json::from_str(r#"{"size":4,"block_size":2,"cells":[1,0,0,4,0,0,1,0,0,1,0,0,4,0,0,1]}"#).unwrap();
        assert_eq!(grid.clue_count(), 6);

        let zero = serde_json::from_str::<Grid>(r#"{"size":0,"block_size":0,"cells":[]}"#);
        assert!(zero.unwrap_err().to_string().contains("empty"));

        let short = serde_json::from_str::<Grid>(r#"{"size":4,"block_size":2,"cells":[1,2,3]}"#);
        assert!(short.is_err());

        let wrong_block = serde_json::from_str::<Grid>(r#"{"size":1,"block_size":3,"cells":[1]}"#);
        assert!(wrong_block.unwrap_err().to_string().contains("block size 3"));

        let out_of_range = serde_json::from_str::<Grid>(r#"{"size":1,"block_size":1,"cells":[7]}"#);
        assert!(out_of_range.is_err());
    }

    #[test]
    fn test_set_and_display() {
        let mut grid = Grid::new(4).unwrap();
        grid.set(1, 2, 3).unwrap();
        assert_eq!(grid.get(1, 2), 3);
        assert!(grid.set(0, 0, 5).is_err());
        assert!(grid.set(4, 0, 1).is_err());
        assert_eq!(grid.to_string(), "0 0 0 0\n0 0 3 0\n0 0 0 0\n0 0 0 0\n");
    }
}
