//! File I/O operations for puzzle grids

use super::Grid;
use crate::config::GridFormat;
use crate::error::GridError;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Load a grid from a text file
/// Format: one row per line, values as contiguous digits or whitespace-separated integers
pub fn load_grid_from_file<P: AsRef<Path>>(path: P, format: GridFormat) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    parse_grid_from_string(&content, format)
        .with_context(|| format!("Failed to parse grid from file: {}", path.as_ref().display()))
}

/// Parse a grid from a string representation
pub fn parse_grid_from_string(content: &str, format: GridFormat) -> Result<Grid, GridError> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(GridError::Empty);
    }

    let format = match format {
        GridFormat::Auto => detect_format(&lines),
        explicit => explicit,
    };

    let rows = lines
        .iter()
        .enumerate()
        .map(|(row, line)| match format {
            GridFormat::Whitespace => parse_whitespace_row(row, line),
            _ => parse_digit_row(row, line),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Grid::from_rows(rows)
}

fn detect_format(lines: &[&str]) -> GridFormat {
    if lines.iter().any(|line| line.split_whitespace().nth(1).is_some()) {
        GridFormat::Whitespace
    } else {
        GridFormat::Digits
    }
}

fn parse_whitespace_row(row: usize, line: &str) -> Result<Vec<usize>, GridError> {
    line.split_whitespace()
        .map(|token| match token {
            "." | "_" => Ok(0),
            _ => token.parse().map_err(|_| GridError::InvalidToken {
                row,
                token: token.to_string(),
            }),
        })
        .collect()
}

fn parse_digit_row(row: usize, line: &str) -> Result<Vec<usize>, GridError> {
    line.chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| match ch {
            '.' | '_' => Ok(0),
            _ => ch
                .to_digit(10)
                .map(|digit| digit as usize)
                .ok_or_else(|| GridError::InvalidToken {
                    row,
                    token: ch.to_string(),
                }),
        })
        .collect()
}

/// Save a grid to a text file
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    write_atomically(path.as_ref(), grid.to_string().as_bytes())
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))
}

/// Replace `path` with `contents` through a temporary file in the same directory.
///
/// Readers see either the old file or the complete new one, never a partial write.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    temp.write_all(contents)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Create example puzzle files for testing
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let four = "1004\n0010\n0100\n4001\n";
    std::fs::write(dir.join("sudoku_4x4.txt"), four)
        .context("Failed to write sudoku_4x4.txt")?;

    let nine = "\
530070000
600195000
098000060
800060003
400803001
700020006
060000280
000419005
000080079
";
    std::fs::write(dir.join("sudoku_9x9.txt"), nine)
        .context("Failed to write sudoku_9x9.txt")?;

    let sixteen = "\
0 11 0 0 0 2 3 14 0 0 9 12 0 0 0 16
15 12 0 0 0 11 0 1 13 10 0 0 0 0 7 2
0 0 10 0 0 0 0 0 16 11 0 1 6 4 12 3
0 16 14 1 0 4 0 6 0 3 0 15 0 8 0 0
1 6 5 12 0 0 11 0 0 9 8 0 0 0 0 0
0 0 0 7 14 1 8 0 0 15 6 0 13 5 0 4
4 15 8 0 9 13 0 0 0 0 7 16 3 0 0 0
0 9 13 0 0 0 0 15 10 0 0 0 7 6 0 11
14 0 6 11 0 0 0 12 7 0 0 0 0 3 13 0
0 0 0 5 8 14 0 0 0 0 13 11 0 1 2 6
13 0 16 4 0 15 5 0 0 1 12 6 8 0 0 0
0 0 0 0 0 16 10 0 0 8 0 0 11 9 4 5
0 0 11 0 1 0 14 0 5 0 3 0 15 7 16 0
5 13 15 3 16 0 4 7 0 0 0 0 0 2 0 0
16 1 0 0 0 0 12 2 14 0 15 0 0 0 3 8
9 0 0 0 13 5 0 0 8 6 16 0 0 0 10 0
";
    std::fs::write(dir.join("sudoku_16x16.txt"), sixteen)
        .context("Failed to write sudoku_16x16.txt")?;

    Ok(())
}
