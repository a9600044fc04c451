//! Display and output formatting utilities

use crate::reduction::Solution;
use crate::sudoku::Grid;

/// Format grids and solutions for the console
pub struct GridFormatter;

impl GridFormatter {
    /// Render a grid with separators between blocks; blanks print as `.`
    pub fn format_grid(grid: &Grid) -> String {
        let width = grid.size.to_string().len();
        let block = grid.block_size.max(1);
        let separator = {
            let segment = "-".repeat(block * (width + 1) + 1);
            let mut line = vec![segment; grid.size / block].join("+");
            line.push('\n');
            line
        };

        let mut output = String::new();
        for (row, values) in grid.rows().enumerate() {
            if row > 0 && row % block == 0 {
                output.push_str(&separator);
            }
            for (col, &value) in values.iter().enumerate() {
                if col > 0 && col % block == 0 {
                    output.push_str(" |");
                }
                if value == 0 {
                    output.push_str(&format!(" {:>width$}", ".", width = width));
                } else {
                    output.push_str(&format!(" {:>width$}", value, width = width));
                }
            }
            output.push('\n');
        }
        output
    }

    /// Format a solution next to the puzzle it completes
    pub fn format_solution(solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "=== {}x{} solution ({}) ===\n",
            solution.grid.size, solution.grid.size, solution.backend
        ));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push_str(&format!(
            "Cells: {} given, {} filled\n",
            solution.metadata.clues, solution.metadata.filled_cells
        ));
        output.push_str(&format!(
            "Formula: {} variables ({} bits per cell), {} clauses\n",
            solution.metadata.variables, solution.metadata.bit_width, solution.metadata.clauses
        ));

        output.push_str("\nPuzzle:\n");
        output.push_str(&Self::format_grid(&solution.puzzle));
        output.push_str("\nSolution:\n");
        output.push_str(&Self::format_grid(&solution.grid));

        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_formatting() {
        let grid = Grid::from_rows(vec![
            vec![1, 0, 0, 4],
            vec![0, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![4, 0, 0, 1],
        ])
        .unwrap();

        let formatted = GridFormatter::format_grid(&grid);
        let lines: Vec<&str> = formatted.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], " 1 . | . 4");
        assert_eq!(lines[2], "-----+-----");
        assert_eq!(lines[4], " 4 . | . 1");
    }

    #[test]
    fn test_wide_values_are_aligned() {
        let mut grid = Grid::new(16).unwrap();
        grid.set(0, 0, 16).unwrap();
        grid.set(0, 1, 2).unwrap();

        let formatted = GridFormatter::format_grid(&grid);
        assert!(formatted.starts_with(" 16  2  .  . |"));
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        // Should either be colored or plain text
        assert!(colored.contains("test"));
    }
}
