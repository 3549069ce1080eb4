//! Decomposition of validated regions into drawable loop outlines

use super::validator::{AxisSpan, ValidatedRegion};
use crate::error::KmapError;
use crate::kmap::Cell;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Axis-aligned box in drawing units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CellBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Source of per-cell bounding boxes for one render pass
pub trait CellGeometry {
    fn cell_box(&self, cell: Cell) -> Option<CellBox>;
}

impl CellGeometry for HashMap<Cell, CellBox> {
    fn cell_box(&self, cell: Cell) -> Option<CellBox> {
        self.get(&cell).copied()
    }
}

impl CellGeometry for BTreeMap<Cell, CellBox> {
    fn cell_box(&self, cell: Cell) -> Option<CellBox> {
        self.get(&cell).copied()
    }
}

/// Evenly spaced cells starting at an origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformGeometry {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub gap: f64,
    pub rows: usize,
    pub cols: usize,
}

impl CellGeometry for UniformGeometry {
    fn cell_box(&self, cell: Cell) -> Option<CellBox> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return None;
        }
        Some(CellBox::new(
            self.origin_x + cell.col as f64 * (self.cell_width + self.gap),
            self.origin_y + cell.row as f64 * (self.cell_height + self.gap),
            self.cell_width,
            self.cell_height,
        ))
    }
}

/// Outward inset and rounding applied to every loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopStyle {
    pub padding: f64,
    pub corner_radius: f64,
}

impl Default for LoopStyle {
    fn default() -> Self {
        Self {
            padding: 6.0,
            corner_radius: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// The two edges facing the grid centre, left open
    pub fn inner_sides(self) -> [Side; 2] {
        match self {
            Corner::TopLeft => [Side::Bottom, Side::Right],
            Corner::TopRight => [Side::Bottom, Side::Left],
            Corner::BottomLeft => [Side::Top, Side::Right],
            Corner::BottomRight => [Side::Top, Side::Left],
        }
    }
}

/// One drawable piece of a loop, positioned in geometry units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeDescriptor {
    /// Closed outline rounded on all four corners
    RoundedRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        corner_radius: f64,
    },
    /// Half of a wrapped loop: `open_side` has no stroke and the two corners
    /// away from it are rounded
    OpenSidedPath {
        open_side: Side,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        corner_radius: f64,
    },
    /// One quarter of a four-corner loop; only the outer edges are drawn and
    /// only the outer corner is rounded
    CornerFragment {
        corner: Corner,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        corner_radius: f64,
    },
}

impl ShapeDescriptor {
    pub fn bounds(&self) -> CellBox {
        match *self {
            ShapeDescriptor::RoundedRect { x, y, width, height, .. }
            | ShapeDescriptor::OpenSidedPath { x, y, width, height, .. }
            | ShapeDescriptor::CornerFragment { x, y, width, height, .. } => {
                CellBox::new(x, y, width, height)
            }
        }
    }

    /// Edges that are not stroked
    pub fn open_sides(&self) -> Vec<Side> {
        match *self {
            ShapeDescriptor::RoundedRect { .. } => Vec::new(),
            ShapeDescriptor::OpenSidedPath { open_side, .. } => vec![open_side],
            ShapeDescriptor::CornerFragment { corner, .. } => corner.inner_sides().to_vec(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ShapeDescriptor::RoundedRect { .. } => "rounded_rect",
            ShapeDescriptor::OpenSidedPath { .. } => "open_sided_path",
            ShapeDescriptor::CornerFragment { .. } => "corner_fragment",
        }
    }
}

/// Turns validated regions into shape descriptors against a geometry snapshot
pub struct ShapeSynthesizer<'a, G: CellGeometry + ?Sized> {
    geometry: &'a G,
    style: LoopStyle,
}

impl<'a, G: CellGeometry + ?Sized> ShapeSynthesizer<'a, G> {
    pub fn new(geometry: &'a G, style: LoopStyle) -> Self {
        Self { geometry, style }
    }

    /// Shapes for `region`: one for a rectangle, two for a single wrap,
    /// four for a four-corner wrap
    pub fn synthesize(&self, region: &ValidatedRegion) -> Result<Vec<ShapeDescriptor>, KmapError> {
        let radius = self.style.corner_radius;

        match *region {
            ValidatedRegion::Rectangle { rows, cols } => {
                let hull = self.hull(run(rows), run(cols))?;
                Ok(vec![ShapeDescriptor::RoundedRect {
                    x: hull.x,
                    y: hull.y,
                    width: hull.width,
                    height: hull.height,
                    corner_radius: radius,
                }])
            }
            ValidatedRegion::WrappedRows { rows, cols } => {
                let [top, bottom] = halves(rows);
                self.open_pair([(top, Side::Top), (bottom, Side::Bottom)], |rows| (rows, run(cols)))
            }
            ValidatedRegion::WrappedCols { rows, cols } => {
                let [left, right] = halves(cols);
                self.open_pair([(left, Side::Left), (right, Side::Right)], |cols| (run(rows), cols))
            }
            ValidatedRegion::WrappedBoth { rows, cols } => {
                let [top, bottom] = halves(rows);
                let [left, right] = halves(cols);
                [
                    (Corner::TopLeft, top, left),
                    (Corner::TopRight, top, right),
                    (Corner::BottomLeft, bottom, left),
                    (Corner::BottomRight, bottom, right),
                ]
                .into_iter()
                .map(|(corner, rows, cols)| {
                    let hull = self.hull(rows, cols)?;
                    Ok(ShapeDescriptor::CornerFragment {
                        corner,
                        x: hull.x,
                        y: hull.y,
                        width: hull.width,
                        height: hull.height,
                        corner_radius: radius,
                    })
                })
                .collect()
            }
            ValidatedRegion::Invalid { ref reason } => Err(KmapError::InvalidGroupShape {
                minterms: Vec::new(),
                reason: reason.clone(),
            }),
        }
    }

    fn open_pair(
        &self,
        pieces: [((usize, usize), Side); 2],
        place: impl Fn((usize, usize)) -> ((usize, usize), (usize, usize)),
    ) -> Result<Vec<ShapeDescriptor>, KmapError> {
        pieces
            .into_iter()
            .map(|(segment, open_side)| {
                let (rows, cols) = place(segment);
                let hull = self.hull(rows, cols)?;
                Ok(ShapeDescriptor::OpenSidedPath {
                    open_side,
                    x: hull.x,
                    y: hull.y,
                    width: hull.width,
                    height: hull.height,
                    corner_radius: self.style.corner_radius,
                })
            })
            .collect()
    }

    /// Padded box around rows `r0..=r1` and columns `c0..=c1`
    fn hull(&self, (r0, r1): (usize, usize), (c0, c1): (usize, usize)) -> Result<CellBox, KmapError> {
        let top_left = self.cell_box(Cell::new(r0, c0))?;
        let bottom_right = self.cell_box(Cell::new(r1, c1))?;
        let pad = self.style.padding;

        Ok(CellBox::new(
            top_left.x - pad,
            top_left.y - pad,
            bottom_right.right() - top_left.x + 2.0 * pad,
            bottom_right.bottom() - top_left.y + 2.0 * pad,
        ))
    }

    fn cell_box(&self, cell: Cell) -> Result<CellBox, KmapError> {
        self.geometry
            .cell_box(cell)
            .ok_or(KmapError::MissingCellGeometry {
                row: cell.row,
                col: cell.col,
            })
    }
}

/// The single segment of an unwrapped span
fn run(span: AxisSpan) -> (usize, usize) {
    let segments = span.segments();
    (segments[0].0, segments[segments.len() - 1].1)
}

/// Head and tail segments of a wrapped span
fn halves(span: AxisSpan) -> [(usize, usize); 2] {
    let segments = span.segments();
    [segments[0], segments[segments.len() - 1]]
}

/// Free-function form of [`ShapeSynthesizer::synthesize`]
pub fn synthesize<G: CellGeometry + ?Sized>(
    region: &ValidatedRegion,
    geometry: &G,
    style: LoopStyle,
) -> Result<Vec<ShapeDescriptor>, KmapError> {
    ShapeSynthesizer::new(geometry, style).synthesize(region)
}
