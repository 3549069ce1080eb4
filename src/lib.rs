//! Karnaugh Map Loop Geometry
//!
//! This library maps n-variable truth tables onto Gray-coded grids, checks
//! that implicants form rectangles on the torus, and turns them into loop
//! outlines that stay correct across the grid edges. It also converts between
//! sum-of-products text and minterm sets and ships a Quine-McCluskey minimizer.

pub mod config;
pub mod error;
pub mod expression;
pub mod grouping;
pub mod kmap;
pub mod session;
pub mod solver;
pub mod utils;

pub use config::Settings;
pub use error::{InvalidShapeReason, KmapError};
pub use session::{KmapProblem, Visualization};
pub use solver::{MinimizationSolver, QuineMcCluskey};

use kmap::ProblemSpec;

/// Main entry point: minimize a problem with the configured solver and lay out its loops
pub fn visualize(settings: Settings, spec: ProblemSpec) -> Result<Visualization, KmapError> {
    let solver = settings.solver();
    KmapProblem::new(settings, spec)?.solve(&solver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visualize_top_and_bottom_rows() {
        let visualization = visualize(
            Settings::default(),
            ProblemSpec::new(4, vec![0, 1, 2, 3, 8, 9, 10, 11], vec![]),
        )
        .unwrap();
        assert_eq!(visualization.expression, "B'");

        let render = visualization.render.unwrap();
        let shapes = &render.loops[0].shapes;
        assert_eq!(shapes.len(), 2);
        assert!(shapes
            .iter()
            .all(|shape| matches!(shape, grouping::ShapeDescriptor::OpenSidedPath { .. })));
    }
}
