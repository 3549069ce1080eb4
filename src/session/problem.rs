//! Karnaugh map problem definition

use super::Visualization;
use crate::config::Settings;
use crate::error::KmapError;
use crate::expression;
use crate::grouping::LoopRenderer;
use crate::kmap::{GridLayout, KmapGrid, ProblemSpec, MAX_GRID_VARIABLES};
use crate::solver::{MinimizationSolver, SolveRequest};
use tracing::debug;

/// A checked set of minterms and don't-cares plus the settings to draw it with
#[derive(Debug, Clone)]
pub struct KmapProblem {
    settings: Settings,
    spec: ProblemSpec,
}

impl KmapProblem {
    /// Create a new problem; the sets are sorted and deduplicated
    pub fn new(settings: Settings, spec: ProblemSpec) -> Result<Self, KmapError> {
        let mut spec = spec;
        spec.minterms.sort_unstable();
        spec.minterms.dedup();
        spec.dont_cares.sort_unstable();
        spec.dont_cares.dedup();

        SolveRequest::new(spec.num_vars, spec.minterms.clone(), spec.dont_cares.clone()).validate()?;
        Ok(Self { settings, spec })
    }

    /// Create a problem whose on-set is what `expr` evaluates to
    pub fn from_expression(settings: Settings, expr: &str, num_vars: u32) -> Result<Self, KmapError> {
        let minterms = expression::parse(expr, num_vars)?;
        let mut spec = ProblemSpec::new(num_vars, minterms, Vec::new());
        spec.expression = Some(expr.trim().to_string());
        Self::new(settings, spec)
    }

    /// Create a problem from an edited grid
    pub fn from_grid(settings: Settings, grid: &KmapGrid) -> Result<Self, KmapError> {
        let (minterms, dont_cares) = grid.extract();
        Self::new(settings, ProblemSpec::new(grid.layout.num_vars(), minterms, dont_cares))
    }

    pub fn spec(&self) -> &ProblemSpec {
        &self.spec
    }

    pub fn num_vars(&self) -> u32 {
        self.spec.num_vars
    }

    /// Get the problem settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether the problem can be drawn as a grid
    pub fn is_drawable(&self) -> bool {
        self.spec.num_vars <= MAX_GRID_VARIABLES
    }

    /// Input grid for drawable problems
    pub fn grid(&self) -> Option<KmapGrid> {
        let layout = GridLayout::new(self.spec.num_vars).ok()?;
        KmapGrid::from_sets(layout, &self.spec.minterms, &self.spec.dont_cares).ok()
    }

    pub fn request(&self) -> SolveRequest {
        SolveRequest::new(self.spec.num_vars, self.spec.minterms.clone(), self.spec.dont_cares.clone())
    }

    /// Minimize with `solver` and lay out the result. Problems beyond four
    /// variables get the expression and legend without loops.
    pub fn solve<S: MinimizationSolver + ?Sized>(&self, solver: &S) -> Result<Visualization, KmapError> {
        let response = solver.solve(&self.request())?;
        debug!(num_vars = self.spec.num_vars, expression = %response.expression, "solved problem");

        let render = if self.is_drawable() {
            let layout = GridLayout::new(self.spec.num_vars)?;
            let geometry = self.settings.geometry_for(&layout);
            let renderer = LoopRenderer::new(layout, &geometry, self.settings.loop_style())
                .with_palette(self.settings.loops.palette.clone())
                .with_cross_check(self.settings.solver.cross_check);
            Some(renderer.render(&response.implicants)?)
        } else {
            None
        };

        Ok(Visualization::new(
            &self.spec,
            response,
            self.grid(),
            render,
            &self.settings.loops.palette,
        ))
    }
}
