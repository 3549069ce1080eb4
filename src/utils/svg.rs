//! SVG output for drawn loops

use crate::config::Settings;
use crate::grouping::{CellGeometry, Corner, ShapeDescriptor, Side};
use crate::kmap::{Cell, GridLayout};
use crate::session::Visualization;

/// Path data assembled one segment at a time
#[derive(Default)]
struct PathData(String);

impl PathData {
    fn segment(mut self, command: char, points: &[(f64, f64)]) -> Self {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        self.0.push(command);
        for (x, y) in points {
            self.0.push_str(&format!(" {} {}", x, y));
        }
        self
    }

    fn move_to(self, x: f64, y: f64) -> Self {
        self.segment('M', &[(x, y)])
    }

    fn line_to(self, x: f64, y: f64) -> Self {
        self.segment('L', &[(x, y)])
    }

    /// Quadratic curve through control point `c` to `to`
    fn curve_to(self, c: (f64, f64), to: (f64, f64)) -> Self {
        self.segment('Q', &[c, to])
    }

    fn close(self) -> Self {
        self.segment('Z', &[])
    }

    fn finish(self) -> String {
        self.0
    }
}

/// SVG path data for one shape. Open edges are simply not part of the path.
pub fn path_data(shape: &ShapeDescriptor) -> String {
    match *shape {
        ShapeDescriptor::RoundedRect {
            x,
            y,
            width: w,
            height: h,
            corner_radius: r,
        } => PathData::default()
            .move_to(x + r, y)
            .line_to(x + w - r, y)
            .curve_to((x + w, y), (x + w, y + r))
            .line_to(x + w, y + h - r)
            .curve_to((x + w, y + h), (x + w - r, y + h))
            .line_to(x + r, y + h)
            .curve_to((x, y + h), (x, y + h - r))
            .line_to(x, y + r)
            .curve_to((x, y), (x + r, y))
            .close()
            .finish(),
        ShapeDescriptor::OpenSidedPath {
            open_side,
            x,
            y,
            width: w,
            height: h,
            corner_radius: r,
        } => {
            let path = PathData::default();
            let path = match open_side {
                Side::Top => path
                    .move_to(x, y)
                    .line_to(x, y + h - r)
                    .curve_to((x, y + h), (x + r, y + h))
                    .line_to(x + w - r, y + h)
                    .curve_to((x + w, y + h), (x + w, y + h - r))
                    .line_to(x + w, y),
                Side::Bottom => path
                    .move_to(x + w, y + h)
                    .line_to(x + w, y + r)
                    .curve_to((x + w, y), (x + w - r, y))
                    .line_to(x + r, y)
                    .curve_to((x, y), (x, y + r))
                    .line_to(x, y + h),
                Side::Left => path
                    .move_to(x, y + h)
                    .line_to(x + w - r, y + h)
                    .curve_to((x + w, y + h), (x + w, y + h - r))
                    .line_to(x + w, y + r)
                    .curve_to((x + w, y), (x + w - r, y))
                    .line_to(x, y),
                Side::Right => path
                    .move_to(x + w, y)
                    .line_to(x + r, y)
                    .curve_to((x, y), (x, y + r))
                    .line_to(x, y + h - r)
                    .curve_to((x, y + h), (x + r, y + h))
                    .line_to(x + w, y + h),
            };
            path.finish()
        }
        ShapeDescriptor::CornerFragment {
            corner,
            x,
            y,
            width: w,
            height: h,
            corner_radius: r,
        } => {
            let path = PathData::default();
            let path = match corner {
                Corner::TopLeft => path
                    .move_to(x + w, y)
                    .line_to(x + r, y)
                    .curve_to((x, y), (x, y + r))
                    .line_to(x, y + h),
                Corner::TopRight => path
                    .move_to(x, y)
                    .line_to(x + w - r, y)
                    .curve_to((x + w, y), (x + w, y + r))
                    .line_to(x + w, y + h),
                Corner::BottomLeft => path
                    .move_to(x, y)
                    .line_to(x, y + h - r)
                    .curve_to((x, y + h), (x + r, y + h))
                    .line_to(x + w, y + h),
                Corner::BottomRight => path
                    .move_to(x + w, y)
                    .line_to(x + w, y + h - r)
                    .curve_to((x + w, y + h), (x + w - r, y + h))
                    .line_to(x, y + h),
            };
            path.finish()
        }
    }
}

/// Standalone SVG document with the grid, headers and every loop.
/// Returns `None` for problems without a grid.
pub fn svg_document(visualization: &Visualization, settings: &Settings) -> Option<String> {
    let grid = visualization.grid.as_ref()?;
    let layout: &GridLayout = &grid.layout;
    let geometry = settings.geometry_for(layout);
    let g = &settings.geometry;

    let width = 2.0 * g.origin_x + layout.cols() as f64 * (g.cell_width + g.gap);
    let height = 2.0 * g.origin_y + layout.rows() as f64 * (g.cell_height + g.gap) + 30.0;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"monospace\">\n",
        width, height, width, height
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"14\">{}\\{}</text>\n",
        g.origin_x / 4.0,
        g.origin_y / 2.0,
        layout.row_variables(),
        layout.col_variables()
    ));

    for col in 0..layout.cols() {
        if let Some(b) = geometry.cell_box(Cell::new(0, col)) {
            svg.push_str(&format!(
                "  <text x=\"{}\" y=\"{}\" font-size=\"14\" text-anchor=\"middle\">{}</text>\n",
                b.x + b.width / 2.0,
                g.origin_y / 2.0,
                layout.col_label(col)
            ));
        }
    }

    for cell in layout.cells() {
        let Some(b) = geometry.cell_box(cell) else {
            continue;
        };
        if cell.col == 0 {
            svg.push_str(&format!(
                "  <text x=\"{}\" y=\"{}\" font-size=\"14\" text-anchor=\"middle\">{}</text>\n",
                g.origin_x / 2.0,
                b.y + b.height / 2.0 + 5.0,
                layout.row_label(cell.row)
            ));
        }
        let symbol = grid.get(cell).map(|state| state.symbol()).unwrap_or('?');
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#ffffff\" stroke=\"#cccccc\"/>\n",
            b.x, b.y, b.width, b.height
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"18\" text-anchor=\"middle\">{}</text>\n",
            b.x + b.width / 2.0,
            b.y + b.height / 2.0 + 6.0,
            symbol
        ));
    }

    if let Some(render) = &visualization.render {
        for implicant_loop in &render.loops {
            svg.push_str(&format!(
                "  <g stroke=\"{}\" stroke-width=\"{}\" fill=\"none\" opacity=\"{:.2}\">\n",
                implicant_loop.color, settings.loops.stroke_width, implicant_loop.emphasis + 0.3
            ));
            svg.push_str(&format!("    <title>{}</title>\n", implicant_loop.term));
            for shape in &implicant_loop.shapes {
                svg.push_str(&format!("    <path d=\"{}\"/>\n", path_data(shape)));
            }
            svg.push_str("  </g>\n");
        }
    }

    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"16\">F = {}</text>\n",
        g.origin_x / 4.0,
        height - 12.0,
        visualization.expression
    ));
    svg.push_str("</svg>\n");
    Some(svg)
}
