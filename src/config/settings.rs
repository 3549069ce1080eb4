//! Configuration settings for the Karnaugh map visualizer

use crate::grouping::{LoopStyle, UniformGeometry, LOOP_COLORS};
use crate::kmap::GridLayout;
use crate::solver::{QuineMcCluskey, DEFAULT_EXACT_COVER_LIMIT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub geometry: GeometryConfig,
    pub loops: LoopConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

/// Placement of the cell grid in drawing units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    pub padding: f64,
    pub corner_radius: f64,
    pub stroke_width: f64,
    pub palette: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub exact_cover_limit: usize,
    /// Reject implicants whose reported cells disagree with their pattern
    pub cross_check: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Svg,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig {
                origin_x: 60.0,
                origin_y: 60.0,
                cell_width: 60.0,
                cell_height: 60.0,
                gap: 4.0,
            },
            loops: LoopConfig {
                padding: 6.0,
                corner_radius: 12.0,
                stroke_width: 4.0,
                palette: LOOP_COLORS.iter().map(|color| color.to_string()).collect(),
            },
            solver: SolverConfig {
                exact_cover_limit: DEFAULT_EXACT_COVER_LIMIT,
                cross_check: true,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_directory: PathBuf::from("output"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        let geometry = &self.geometry;
        if geometry.cell_width <= 0.0 || geometry.cell_height <= 0.0 {
            anyhow::bail!("Cell width and height must be positive");
        }
        if geometry.gap < 0.0 {
            anyhow::bail!("Cell gap must not be negative");
        }

        if self.loops.padding < 0.0 || self.loops.corner_radius < 0.0 {
            anyhow::bail!("Loop padding and corner radius must not be negative");
        }
        if self.loops.stroke_width <= 0.0 {
            anyhow::bail!("Loop stroke width must be positive");
        }
        if self.loops.palette.is_empty() {
            anyhow::bail!("Loop palette must contain at least one color");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(limit) = cli_overrides.exact_cover_limit {
            self.solver.exact_cover_limit = limit;
        }
        if cli_overrides.no_cross_check {
            self.solver.cross_check = false;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }

    /// Cell boxes for `layout` under the configured geometry
    pub fn geometry_for(&self, layout: &GridLayout) -> UniformGeometry {
        UniformGeometry {
            origin_x: self.geometry.origin_x,
            origin_y: self.geometry.origin_y,
            cell_width: self.geometry.cell_width,
            cell_height: self.geometry.cell_height,
            gap: self.geometry.gap,
            rows: layout.rows(),
            cols: layout.cols(),
        }
    }

    pub fn loop_style(&self) -> LoopStyle {
        LoopStyle {
            padding: self.loops.padding,
            corner_radius: self.loops.corner_radius,
        }
    }

    /// Default minimizer configured from the solver section
    pub fn solver(&self) -> QuineMcCluskey {
        QuineMcCluskey::new(self.solver.exact_cover_limit)
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub exact_cover_limit: Option<usize>,
    pub no_cross_check: bool,
    pub format: Option<OutputFormat>,
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.loops.palette.len(), 8);
        assert_eq!(settings.loop_style(), LoopStyle::default());
        assert_eq!(settings.solver().exact_cover_limit(), 15);
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.yaml");

        let mut settings = Settings::default();
        settings.output.format = OutputFormat::Svg;
        settings.loops.padding = 3.5;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = Settings::default();
        settings.loops.palette.clear();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.geometry.cell_width = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            exact_cover_limit: Some(4),
            no_cross_check: true,
            format: Some(OutputFormat::Json),
            output_dir: Some(PathBuf::from("out")),
        });
        assert_eq!(settings.solver.exact_cover_limit, 4);
        assert!(!settings.solver.cross_check);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert_eq!(settings.output.output_directory, PathBuf::from("out"));
    }

    #[test]
    fn test_geometry_for_layout() {
        let settings = Settings::default();
        let layout = GridLayout::new(3).unwrap();
        let geometry = settings.geometry_for(&layout);
        assert_eq!((geometry.rows, geometry.cols), (2, 4));
    }
}
