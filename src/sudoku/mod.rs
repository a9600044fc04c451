//! Puzzle grid, geometry and text I/O

pub mod grid;
pub mod rules;
pub mod io;

pub use grid::Grid;
pub use rules::{Relation, SharedUnits, SudokuRules};
pub use io::{
    create_example_puzzles, load_grid_from_file, parse_grid_from_string, save_grid_to_file,
    write_atomically,
};
