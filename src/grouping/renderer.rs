//! One render pass: implicant records in, colored loop outlines out

use super::shapes::{CellGeometry, LoopStyle, ShapeDescriptor, ShapeSynthesizer};
use super::validator::{GroupValidator, ValidatedRegion};
use crate::error::KmapError;
use crate::expression::{render, BitPattern};
use crate::kmap::GridLayout;
use crate::solver::ImplicantRecord;
use serde::Serialize;
use tracing::{debug, warn};

/// Stroke colors cycled through by implicant index
pub const LOOP_COLORS: [&str; 8] = [
    "#FF3B30", "#34C759", "#007AFF", "#FF9500", "#AF52DE", "#FFCC00", "#FF2D55", "#5856D6",
];

/// Emphasis of the smallest possible loop
const BASE_EMPHASIS: f64 = 0.3;
/// Extra emphasis granted to the largest loop of the pass
const EMPHASIS_RANGE: f64 = 0.4;

/// A successfully drawn implicant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImplicantLoop {
    /// Position in the input list
    pub index: usize,
    pub color_index: usize,
    pub color: String,
    /// Fill strength in `0.3..=0.7`, larger loops are stronger
    pub emphasis: f64,
    pub pattern: BitPattern,
    pub term: String,
    pub minterms: Vec<u32>,
    pub region: ValidatedRegion,
    pub shapes: Vec<ShapeDescriptor>,
}

/// An implicant that was skipped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDiagnostic {
    pub implicant_index: usize,
    pub pattern: BitPattern,
    pub message: String,
    #[serde(skip)]
    pub error: KmapError,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderPass {
    pub loops: Vec<ImplicantLoop>,
    pub diagnostics: Vec<GroupDiagnostic>,
}

impl RenderPass {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Draws solver output onto one grid layout and geometry snapshot
pub struct LoopRenderer<'a, G: CellGeometry + ?Sized> {
    validator: GroupValidator,
    synthesizer: ShapeSynthesizer<'a, G>,
    palette: Vec<String>,
    cross_check: bool,
}

impl<'a, G: CellGeometry + ?Sized> LoopRenderer<'a, G> {
    /// Create a renderer with the default palette and cross-checking enabled
    pub fn new(layout: GridLayout, geometry: &'a G, style: LoopStyle) -> Self {
        Self {
            validator: GroupValidator::new(layout),
            synthesizer: ShapeSynthesizer::new(geometry, style),
            palette: LOOP_COLORS.iter().map(|color| color.to_string()).collect(),
            cross_check: true,
        }
    }

    /// Replace the palette; an empty palette keeps the default
    pub fn with_palette(mut self, palette: Vec<String>) -> Self {
        if !palette.is_empty() {
            self.palette = palette;
        }
        self
    }

    /// Compare each record's covered set against its pattern before drawing
    pub fn with_cross_check(mut self, cross_check: bool) -> Self {
        self.cross_check = cross_check;
        self
    }

    pub fn layout(&self) -> &GridLayout {
        self.validator.layout()
    }

    /// Process every record independently. Bad shapes and inconsistent
    /// records are collected as diagnostics; any other error ends the pass.
    pub fn render(&self, implicants: &[ImplicantRecord]) -> Result<RenderPass, KmapError> {
        let max_size = implicants
            .iter()
            .map(|record| record.covered_minterms.len())
            .max()
            .unwrap_or(0);

        let mut pass = RenderPass::default();
        for (index, record) in implicants.iter().enumerate() {
            match self.render_one(index, record, max_size) {
                Ok(implicant_loop) => pass.loops.push(implicant_loop),
                Err(error) if error.is_recoverable() => {
                    warn!(index, pattern = %record.pattern, %error, "skipping implicant");
                    pass.diagnostics.push(GroupDiagnostic {
                        implicant_index: index,
                        pattern: record.pattern,
                        message: error.to_string(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        debug!(
            drawn = pass.loops.len(),
            skipped = pass.diagnostics.len(),
            "render pass complete"
        );
        Ok(pass)
    }

    fn render_one(
        &self,
        index: usize,
        record: &ImplicantRecord,
        max_size: usize,
    ) -> Result<ImplicantLoop, KmapError> {
        let mut minterms = record.covered_minterms.clone();
        minterms.sort_unstable();
        minterms.dedup();

        if self.cross_check {
            let expected = record.pattern.covered_minterms();
            if expected != minterms {
                return Err(KmapError::InconsistentImplicant {
                    pattern: record.pattern.to_string(),
                    expected,
                    reported: minterms,
                });
            }
        }

        let region = self.validator.validate(&minterms).into_result(&minterms)?;
        let shapes = self.synthesizer.synthesize(&region)?;
        let color_index = index % self.palette.len();

        debug!(index, kind = region.kind(), shapes = shapes.len(), "loop synthesized");
        Ok(ImplicantLoop {
            index,
            color_index,
            color: self.palette[color_index].clone(),
            emphasis: emphasis(minterms.len(), max_size),
            pattern: record.pattern,
            term: render(&record.pattern),
            minterms,
            region,
            shapes,
        })
    }
}

/// `0.3 + 0.4 * size / max_size`
pub fn emphasis(size: usize, max_size: usize) -> f64 {
    if max_size == 0 {
        return BASE_EMPHASIS;
    }
    BASE_EMPHASIS + EMPHASIS_RANGE * size as f64 / max_size as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::shapes::{CellBox, UniformGeometry};
    use crate::kmap::Cell;
    use std::collections::HashMap;

    fn geometry(layout: &GridLayout) -> UniformGeometry {
        UniformGeometry {
            origin_x: 0.0,
            origin_y: 0.0,
            cell_width: 50.0,
            cell_height: 50.0,
            gap: 2.0,
            rows: layout.rows(),
            cols: layout.cols(),
        }
    }

    fn record(pattern: &str) -> ImplicantRecord {
        ImplicantRecord::from_pattern(pattern.parse().unwrap())
    }

    #[test]
    fn test_colors_and_emphasis() {
        let layout = GridLayout::new(4).unwrap();
        let geometry = geometry(&layout);
        let renderer = LoopRenderer::new(layout, &geometry, LoopStyle::default());

        let pass = renderer.render(&[record("-0-0"), record("11-1"), record("0101")]).unwrap();
        assert!(pass.is_clean());
        assert_eq!(pass.loops.len(), 3);
        assert_eq!(pass.loops[0].color, "#FF3B30");
        assert_eq!(pass.loops[1].color_index, 1);
        assert_eq!(pass.loops[0].term, "B'D'");
        assert!((pass.loops[0].emphasis - 0.7).abs() < 1e-9);
        assert!((pass.loops[1].emphasis - 0.5).abs() < 1e-9);
        assert!((pass.loops[2].emphasis - 0.4).abs() < 1e-9);
        assert_eq!(pass.loops[0].shapes.len(), 4);
    }

    #[test]
    fn test_palette_wraps_around() {
        let layout = GridLayout::new(4).unwrap();
        let geometry = geometry(&layout);
        let renderer = LoopRenderer::new(layout, &geometry, LoopStyle::default());

        let records: Vec<ImplicantRecord> = (0..10)
            .map(|m| ImplicantRecord::from_pattern(BitPattern::from_minterm(4, m).unwrap()))
            .collect();
        let pass = renderer.render(&records).unwrap();
        assert_eq!(pass.loops[8].color_index, 0);
        assert_eq!(pass.loops[9].color, LOOP_COLORS[1]);
    }

    #[test]
    fn test_bad_implicant_is_skipped() {
        let layout = GridLayout::new(2).unwrap();
        let geometry = geometry(&layout);
        let renderer = LoopRenderer::new(layout, &geometry, LoopStyle::default()).with_cross_check(false);

        let bogus = ImplicantRecord {
            pattern: "--".parse().unwrap(),
            covered_minterms: vec![0, 1, 2],
        };
        let pass = renderer.render(&[record("0-"), bogus, record("-1")]).unwrap();

        assert_eq!(pass.loops.len(), 2);
        assert_eq!(pass.loops[1].index, 2);
        assert_eq!(pass.diagnostics.len(), 1);
        assert_eq!(pass.diagnostics[0].implicant_index, 1);
        assert!(matches!(pass.diagnostics[0].error, KmapError::InvalidGroupShape { .. }));
    }

    #[test]
    fn test_cross_check_flags_mismatch() {
        let layout = GridLayout::new(3).unwrap();
        let geometry = geometry(&layout);
        let renderer = LoopRenderer::new(layout, &geometry, LoopStyle::default());

        let wrong = ImplicantRecord {
            pattern: "0--".parse().unwrap(),
            covered_minterms: vec![0, 1],
        };
        let pass = renderer.render(&[wrong]).unwrap();
        assert!(pass.loops.is_empty());
        assert!(matches!(
            pass.diagnostics[0].error,
            KmapError::InconsistentImplicant { .. }
        ));
    }

    #[test]
    fn test_missing_geometry_ends_the_pass() {
        let layout = GridLayout::new(2).unwrap();
        let uniform = geometry(&layout);
        let mut boxes: HashMap<Cell, CellBox> = layout
            .cells()
            .filter_map(|cell| uniform.cell_box(cell).map(|b| (cell, b)))
            .collect();
        boxes.remove(&Cell::new(1, 1));
        let renderer = LoopRenderer::new(layout, &boxes, LoopStyle::default());

        // Minterm 3 sits in the cell without a box
        let result = renderer.render(&[record("0-"), record("-1")]);
        assert!(matches!(
            result,
            Err(KmapError::MissingCellGeometry { row: 1, col: 1 })
        ));

        let pass = renderer.render(&[record("0-")]).unwrap();
        assert_eq!(pass.loops.len(), 1);
    }

    #[test]
    fn test_custom_palette() {
        let layout = GridLayout::new(2).unwrap();
        let geometry = geometry(&layout);
        let renderer = LoopRenderer::new(layout, &geometry, LoopStyle::default())
            .with_palette(vec!["black".to_string()]);
        let pass = renderer.render(&[record("0-"), record("-1")]).unwrap();
        assert!(pass.loops.iter().all(|l| l.color == "black"));
    }
}
