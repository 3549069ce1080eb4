//! Configuration management for the Karnaugh map visualizer

pub mod settings;

pub use settings::{
    CliOverrides, GeometryConfig, LoopConfig, OutputConfig, OutputFormat, Settings, SolverConfig,
};
