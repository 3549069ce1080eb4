//! Display and output formatting utilities

use super::svg::svg_document;
use crate::config::{OutputFormat, Settings};
use crate::grouping::RenderPass;
use crate::kmap::{Cell, KmapGrid};
use crate::session::{BatchOutcome, Visualization};
use anyhow::{Context, Result};
use itertools::Itertools;
use std::path::{Path, PathBuf};

/// Format maps, legends and batch results for the console
pub struct KmapFormatter;

impl KmapFormatter {
    /// Format a grid with Gray-coded headers, e.g.
    ///
    /// ```text
    /// AB\CD  00 01 11 10
    ///    00   1  0  0  1
    /// ```
    pub fn format_grid(grid: &KmapGrid) -> String {
        let layout = &grid.layout;
        let corner = format!("{}\\{}", layout.row_variables(), layout.col_variables());
        let label_width = corner.len().max(layout.row_label(0).len());
        let cell_width = layout.col_label(0).len().max(1) + 1;

        let mut output = String::new();
        output.push_str(&format!("{:>width$} ", corner, width = label_width));
        for col in 0..layout.cols() {
            output.push_str(&format!("{:>width$}", layout.col_label(col), width = cell_width));
        }
        output.push('\n');

        for row in 0..layout.rows() {
            output.push_str(&format!("{:>width$} ", layout.row_label(row), width = label_width));
            for col in 0..layout.cols() {
                let symbol = grid.get(Cell::new(row, col)).map(|s| s.symbol()).unwrap_or('?');
                output.push_str(&format!("{:>width$}", symbol, width = cell_width));
            }
            output.push('\n');
        }
        output
    }

    /// Which loops cover each cell, numbered from 1; `.` marks uncovered cells
    pub fn format_loop_membership(grid: &KmapGrid, render: &RenderPass) -> String {
        let layout = &grid.layout;
        let mut output = String::new();
        for row in 0..layout.rows() {
            let line = (0..layout.cols())
                .map(|col| {
                    let Ok(minterm) = layout.cell_to_index(Cell::new(row, col)) else {
                        return ".".to_string();
                    };
                    let owners: Vec<usize> = render
                        .loops
                        .iter()
                        .filter(|l| l.minterms.contains(&minterm))
                        .map(|l| l.index + 1)
                        .collect();
                    if owners.is_empty() {
                        ".".to_string()
                    } else {
                        owners.iter().join(",")
                    }
                })
                .map(|cell| format!("{:>6}", cell))
                .join("");
            output.push_str(&line);
            output.push('\n');
        }
        output
    }

    /// Full text report for one solved problem
    pub fn format_visualization(visualization: &Visualization) -> String {
        let mut output = String::new();
        output.push_str(&format!("=== {}-variable map ===\n", visualization.num_vars));
        output.push_str(&format!("Minterms:    {}\n", visualization.minterms.iter().join(", ")));
        if !visualization.dont_cares.is_empty() {
            output.push_str(&format!("Don't cares: {}\n", visualization.dont_cares.iter().join(", ")));
        }
        output.push('\n');

        if let Some(grid) = &visualization.grid {
            output.push_str(&Self::format_grid(grid));
            output.push('\n');
            if let Some(render) = &visualization.render {
                if !render.loops.is_empty() {
                    output.push_str("Loops:\n");
                    output.push_str(&Self::format_loop_membership(grid, render));
                    output.push('\n');
                }
                for diagnostic in &render.diagnostics {
                    output.push_str(&format!(
                        "Skipped implicant {} ({}): {}\n",
                        diagnostic.implicant_index + 1,
                        diagnostic.pattern,
                        diagnostic.message
                    ));
                }
            }
        } else {
            output.push_str("(no grid drawn beyond four variables)\n\n");
        }

        output.push_str(&visualization.legend_text());
        output.push('\n');
        output
    }

    /// Format batch results as a summary table
    pub fn format_batch_summary(outcomes: &[BatchOutcome]) -> String {
        let mut output = String::new();
        output.push_str("Batch Summary:\n");
        output.push_str("  # | Vars | Minterms             | Result\n");
        output.push_str("----|------|----------------------|------------------------\n");

        for outcome in outcomes {
            let minterms = outcome.spec.minterms.iter().join(",");
            let minterms = if minterms.len() > 20 {
                format!("{}...", &minterms[..17])
            } else {
                minterms
            };
            let result = match (&outcome.error, &outcome.spec.expression) {
                (Some(error), _) => format!("error: {}", error),
                (None, Some(expression)) => expression.clone(),
                (None, None) => String::new(),
            };
            output.push_str(&format!(
                "{:3} | {:4} | {:20} | {}\n",
                outcome.index + 1,
                outcome.spec.num_vars,
                minterms,
                result
            ));
        }
        output
    }

    /// Save a visualization in the configured format; returns the written path
    pub fn save_visualization<P: AsRef<Path>>(
        visualization: &Visualization,
        settings: &Settings,
        output_dir: P,
        name: &str,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let path = match settings.output.format {
            OutputFormat::Text => {
                let path = output_dir.join(format!("{}.txt", name));
                std::fs::write(&path, Self::format_visualization(visualization))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join(format!("{}.json", name));
                visualization.save_to_file(&path)?;
                path
            }
            OutputFormat::Svg => {
                let Some(svg) = svg_document(visualization, settings) else {
                    anyhow::bail!(
                        "SVG output needs a drawable map (2-4 variables), got {}",
                        visualization.num_vars
                    );
                };
                let path = output_dir.join(format!("{}.svg", name));
                std::fs::write(&path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
                path
            }
        };
        Ok(path)
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
