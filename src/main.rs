//! Main CLI application for the Sudoku SAT reduction

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use sudoku_sat::{
    config::{CliOverrides, GridFormat, OutputFormat, Settings, SolverBackend},
    reduction::{Solution, SolutionValidator, SudokuProblem},
    sat::SolutionDecoder,
    sudoku::{create_example_puzzles, load_grid_from_file, save_grid_to_file, SudokuRules},
    utils::{ColorOutput, GridFormatter},
};
use tracing_subscriber::EnvFilter;

/// Exit status used by SAT solvers for an unsatisfiable instance
const EXIT_UNSATISFIABLE: u8 = 20;

#[derive(Parser)]
#[command(name = "sudoku_sat")]
#[command(about = "Reduce Sudoku puzzles to DIMACS CNF with a binary value encoding")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the DIMACS formula for a puzzle
    Encode {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// Puzzle row format (overrides config)
        #[arg(long, value_enum)]
        format: Option<GridFormat>,

        /// Formula file to write (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compile clause groups in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Turn a solver result file back into a solved grid
    Decode {
        /// Solver output (MiniSat or SAT-competition layout)
        #[arg(short, long)]
        assignment: PathBuf,

        /// Grid size N of the encoded puzzle
        #[arg(short, long)]
        size: usize,

        /// Solved grid file to write
        #[arg(short, long, default_value = "output/solution.txt")]
        output: PathBuf,
    },

    /// Encode, solve and decode a puzzle
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// Puzzle row format (overrides config)
        #[arg(long, value_enum)]
        format: Option<GridFormat>,

        /// Solver backend (overrides config)
        #[arg(short, long, value_enum)]
        backend: Option<SolverBackend>,

        /// External solver program (overrides config)
        #[arg(long)]
        solver: Option<String>,

        /// Formula file handed to an external solver (overrides config)
        #[arg(long)]
        formula: Option<PathBuf>,

        /// Solution file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Solution file format (overrides config)
        #[arg(long, value_enum)]
        output_format: Option<OutputFormat>,

        /// Compile clause groups in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Check a solved grid against its puzzle
    Validate {
        /// Puzzle file
        #[arg(short, long)]
        puzzle: PathBuf,

        /// Solved grid file, or a `.json` solution written by `solve`
        #[arg(short, long)]
        solution: PathBuf,

        /// Row format of both files
        #[arg(long, value_enum, default_value = "auto")]
        format: GridFormat,
    },

    /// Show clause and variable counts for a puzzle without solving it
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,
    },

    /// Create example configuration and puzzle files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode {
            config,
            puzzle,
            format,
            output,
            parallel,
        } => {
            let overrides = CliOverrides {
                puzzle_file: puzzle,
                input_format: format,
                parallel,
                formula_file: output,
                ..CliOverrides::default()
            };
            encode_command(&config, &overrides)
        }
        Commands::Decode {
            assignment,
            size,
            output,
        } => decode_command(&assignment, size, &output),
        Commands::Solve {
            config,
            puzzle,
            format,
            backend,
            solver,
            formula,
            output,
            output_format,
            parallel,
        } => {
            let overrides = CliOverrides {
                puzzle_file: puzzle,
                input_format: format,
                backend,
                solver_command: solver,
                parallel,
                formula_file: formula,
                solution_file: output,
                output_format,
            };
            solve_command(&config, &overrides)
        }
        Commands::Validate {
            puzzle,
            solution,
            format,
        } => validate_command(&puzzle, &solution, format),
        Commands::Analyze { config, puzzle } => analyze_command(&config, puzzle),
        Commands::Setup { directory, force } => setup_command(&directory, force).map(|_| ExitCode::SUCCESS),
    }
}

fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = Settings::from_file_or_default(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn encode_command(config_path: &Path, overrides: &CliOverrides) -> Result<ExitCode> {
    let settings = load_settings(config_path, overrides)?;
    let formula_file = settings.output.formula_file.clone();

    let problem = SudokuProblem::new(settings).context("Failed to create problem")?;
    let start_time = Instant::now();
    let counts = problem.write_formula(&formula_file)?;

    println!("{}", ColorOutput::success(&format!(
        "Wrote {} ({} variables, {} clauses) in {:.3}s",
        formula_file.display(),
        counts.variables,
        counts.total(),
        start_time.elapsed().as_secs_f64()
    )));

    Ok(ExitCode::SUCCESS)
}

fn decode_command(assignment_path: &Path, size: usize, output_path: &Path) -> Result<ExitCode> {
    let text = std::fs::read_to_string(assignment_path)
        .with_context(|| format!("Failed to read solver output {}", assignment_path.display()))?;

    let decoder = SolutionDecoder::new(size).context("Invalid grid size")?;
    let decoded = decoder
        .decode_output(&text)
        .with_context(|| format!("Failed to decode {}", assignment_path.display()))?;

    match decoded {
        Some(grid) => {
            save_grid_to_file(&grid, output_path)?;
            println!("{}", GridFormatter::format_grid(&grid));
            println!("{}", ColorOutput::success(&format!("Solution written to {}", output_path.display())));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("{}", ColorOutput::warning("No solution: the formula is unsatisfiable"));
            Ok(ExitCode::from(EXIT_UNSATISFIABLE))
        }
    }
}

fn solve_command(config_path: &Path, overrides: &CliOverrides) -> Result<ExitCode> {
    let settings = load_settings(config_path, overrides)?;
    let solution_file = settings.output.solution_file.clone();
    let output_format = settings.output.format;

    println!("{}", ColorOutput::info(&format!(
        "Solving {} with {:?} backend",
        settings.input.puzzle_file.display(),
        settings.solver.backend
    )));

    let mut problem = SudokuProblem::new(settings).context("Failed to create problem")?;
    let Some(solution) = problem.solve().context("Failed to solve puzzle")? else {
        println!("{}", ColorOutput::warning("No solution: the puzzle is unsatisfiable"));
        return Ok(ExitCode::from(EXIT_UNSATISFIABLE));
    };

    println!("{}", GridFormatter::format_solution(&solution));
    println!("{}", problem.solver_statistics());
    solution
        .save_to_file(&solution_file, output_format)
        .context("Failed to save solution")?;
    println!("{}", ColorOutput::success(&format!("Solution saved to {}", solution_file.display())));

    Ok(ExitCode::SUCCESS)
}

fn validate_command(puzzle_path: &Path, solution_path: &Path, format: GridFormat) -> Result<ExitCode> {
    let puzzle = load_grid_from_file(puzzle_path, format)
        .with_context(|| format!("Failed to load puzzle from {}", puzzle_path.display()))?;
    let solution = if solution_path.extension().is_some_and(|ext| ext == "json") {
        Solution::load_from_file(solution_path)?.grid
    } else {
        load_grid_from_file(solution_path, format)
            .with_context(|| format!("Failed to load solution from {}", solution_path.display()))?
    };

    let result = SolutionValidator::new().validate(&puzzle, &solution);
    println!("{}", result);

    if result.is_valid {
        println!("{}", ColorOutput::success("Solution is valid"));
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", ColorOutput::error("Solution is invalid"));
        Ok(ExitCode::FAILURE)
    }
}

fn analyze_command(config_path: &Path, puzzle: Option<PathBuf>) -> Result<ExitCode> {
    let overrides = CliOverrides {
        puzzle_file: puzzle,
        ..CliOverrides::default()
    };
    let settings = load_settings(config_path, &overrides)?;
    let problem = SudokuProblem::new(settings).context("Failed to create problem for analysis")?;
    let grid = problem.puzzle();

    println!("Puzzle ({}x{}):", grid.size, grid.size);
    println!("{}", GridFormatter::format_grid(grid));
    println!("Grid Statistics:");
    println!("  Clues: {} of {} cells", grid.clue_count(), grid.cell_count());
    println!("  Peers per cell: {}", SudokuRules::peers_per_cell(grid.size, grid.block_size));
    println!();
    println!("{}", problem.encoding_statistics());

    Ok(ExitCode::SUCCESS)
}

fn setup_command(directory: &Path, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/puzzles");
    let output_dir = directory.join("output");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_puzzles(&input_dir).context("Failed to create example puzzles")?;
    println!("Created example puzzles in: {}", input_dir.display());

    let variants_dir = config_dir.join("examples");
    std::fs::create_dir_all(&variants_dir)?;

    let mut small = Settings::default();
    small.input.puzzle_file = PathBuf::from("input/puzzles/sudoku_4x4.txt");
    small.output.format = OutputFormat::Json;
    small.output.solution_file = PathBuf::from("output/solution.json");
    small.to_file(&variants_dir.join("small.yaml"))?;

    let mut external = Settings::default();
    external.solver.backend = SolverBackend::External;
    external.input.puzzle_file = PathBuf::from("input/puzzles/sudoku_16x16.txt");
    external.input.format = GridFormat::Whitespace;
    external.encoding.parallel = true;
    external.to_file(&variants_dir.join("external_minisat.yaml"))?;

    println!("Created example configurations in: {}", variants_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your puzzles to {}", input_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}
