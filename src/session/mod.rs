//! Problem sessions: checked inputs, solving, drawing and batch runs

pub mod batch;
pub mod problem;
pub mod visualization;

pub use batch::{outcomes_to_csv, save_csv, solve_batch, BatchOutcome};
pub use problem::KmapProblem;
pub use visualization::{LegendEntry, Visualization};
