//! Configuration management for the puzzle reduction

pub mod settings;

pub use settings::{
    Settings, InputConfig, EncodingConfig, SolverConfig, OutputConfig,
    GridFormat, SolverBackend, OutputFormat, CliOverrides
};
