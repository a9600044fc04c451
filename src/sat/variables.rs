//! Variable layout for the binary cell encoding

use crate::error::GridError;
use crate::sudoku::Grid;
use std::ops::RangeInclusive;

/// Smallest `k` with `2^k > size`: enough bits for every value plus the blank sentinel
pub fn bit_width(size: usize) -> usize {
    (usize::BITS - size.leading_zeros()) as usize
}

/// Maps cells to their groups of boolean variables.
///
/// Cell `i` (1-based, `1..=N²`) owns variables `k*(i-1)+1 ..= k*i`, most
/// significant bit first. Nothing is stored per cell; groups are computed
/// from `(i, k)` on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLayout {
    size: usize,
    bit_width: usize,
}

impl VariableLayout {
    /// Create the layout for an N x N grid
    pub fn new(size: usize) -> Result<Self, GridError> {
        let bit_width = bit_width(size);
        let total = size
            .checked_mul(size)
            .and_then(|cells| cells.checked_mul(bit_width))
            .ok_or(GridError::TooLarge(size))?;
        if total > i32::MAX as usize {
            return Err(GridError::TooLarge(size));
        }
        Ok(Self { size, bit_width })
    }

    /// Layout matching a loaded grid
    pub fn for_grid(grid: &Grid) -> Result<Self, GridError> {
        Self::new(grid.size)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Total number of variables, `N² * k`
    pub fn variable_count(&self) -> usize {
        self.cell_count() * self.bit_width
    }

    /// Variable identifiers of a 1-based cell, MSB first
    pub fn group(&self, cell: usize) -> Vec<i32> {
        self.group_range(cell).collect()
    }

    /// Same as [`group`](Self::group) as a range
    pub fn group_range(&self, cell: usize) -> RangeInclusive<i32> {
        debug_assert!((1..=self.cell_count()).contains(&cell), "cell {} out of range", cell);
        // Bounded by `variable_count`, checked against i32::MAX in `new`
        let first = (self.bit_width * (cell - 1) + 1) as i32;
        let last = (self.bit_width * cell) as i32;
        first..=last
    }

    /// Codes a group can hold that are not legal values: 0 and `N+1 ..= 2^k - 1`
    pub fn forbidden_codes(&self) -> impl Iterator<Item = usize> {
        let max_code = (1usize << self.bit_width) - 1;
        std::iter::once(0).chain(self.size + 1..=max_code)
    }

    /// Number of codes returned by [`forbidden_codes`](Self::forbidden_codes), `2^k - N`
    pub fn forbidden_code_count(&self) -> usize {
        (1usize << self.bit_width) - self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_width() {
        assert_eq!(bit_width(1), 1);
        assert_eq!(bit_width(4), 3);
        assert_eq!(bit_width(9), 4);
        assert_eq!(bit_width(16), 5);
        assert_eq!(bit_width(25), 5);
        assert_eq!(bit_width(36), 6);

        for size in 1..200usize {
            let k = bit_width(size);
            assert!(1usize << k > size);
            assert!(1usize << (k - 1) <= size);
        }
    }

    #[test]
    fn test_groups_are_contiguous_and_disjoint() {
        let layout = VariableLayout::new(9).unwrap();
        assert_eq!(layout.group(1), vec![1, 2, 3, 4]);
        assert_eq!(layout.group(2), vec![5, 6, 7, 8]);
        assert_eq!(layout.group(81), vec![321, 322, 323, 324]);

        let all: Vec<i32> = (1..=layout.cell_count()).flat_map(|cell| layout.group(cell)).collect();
        let expected: Vec<i32> = (1..=layout.variable_count() as i32).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_variable_count() {
        assert_eq!(VariableLayout::new(4).unwrap().variable_count(), 48);
        assert_eq!(VariableLayout::new(9).unwrap().variable_count(), 324);
        assert_eq!(VariableLayout::new(16).unwrap().variable_count(), 1280);
        assert_eq!(VariableLayout::new(25).unwrap().variable_count(), 3125);
    }

    #[test]
    fn test_group_range() {
        let layout = VariableLayout::new(4).unwrap();
        assert_eq!(layout.group_range(1), 1..=3);
        assert_eq!(layout.group_range(16), 46..=48);
    }

    #[test]
    fn test_forbidden_codes() {
        let nine = VariableLayout::new(9).unwrap();
        assert_eq!(nine.forbidden_codes().collect::<Vec<_>>(), vec![0, 10, 11, 12, 13, 14, 15]);
        assert_eq!(nine.forbidden_code_count(), 7);

        let four = VariableLayout::new(4).unwrap();
        assert_eq!(four.forbidden_codes().collect::<Vec<_>>(), vec![0, 5, 6, 7]);

        let sixteen = VariableLayout::new(16).unwrap();
        assert_eq!(sixteen.forbidden_codes().count(), sixteen.forbidden_code_count());
        assert_eq!(sixteen.forbidden_code_count(), 16);
    }

    #[test]
    fn test_too_large() {
        assert_eq!(VariableLayout::new(1 << 20), Err(GridError::TooLarge(1 << 20)));
    }
}
