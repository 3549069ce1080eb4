//! Serializable result of solving and drawing one problem

use crate::expression::BitPattern;
use crate::grouping::RenderPass;
use crate::kmap::{KmapGrid, ProblemSpec};
use crate::solver::{ImplicantRecord, SolveResponse, SolveStatistics};
use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Serialize;
use std::path::Path;

/// One legend line: a term, its color and the minterms it groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub index: usize,
    pub term: String,
    pub pattern: BitPattern,
    pub color: String,
    pub minterms: Vec<u32>,
}

/// Everything the presentation layer needs for one problem
#[derive(Debug, Clone, Serialize)]
pub struct Visualization {
    pub num_vars: u32,
    pub minterms: Vec<u32>,
    pub dont_cares: Vec<u32>,
    pub expression: String,
    pub legend: Vec<LegendEntry>,
    pub prime_implicants: Vec<ImplicantRecord>,
    /// Input grid; absent beyond four variables
    pub grid: Option<KmapGrid>,
    /// Loops and skipped implicants; absent beyond four variables
    pub render: Option<RenderPass>,
    pub statistics: SolveStatistics,
}

impl Visualization {
    pub fn new(
        spec: &ProblemSpec,
        response: SolveResponse,
        grid: Option<KmapGrid>,
        render: Option<RenderPass>,
        palette: &[String],
    ) -> Self {
        let legend = response
            .implicants
            .iter()
            .enumerate()
            .map(|(index, record)| LegendEntry {
                index,
                term: crate::expression::render(&record.pattern),
                pattern: record.pattern,
                color: palette
                    .get(index % palette.len().max(1))
                    .cloned()
                    .unwrap_or_default(),
                minterms: record.covered_minterms.clone(),
            })
            .collect();

        Self {
            num_vars: spec.num_vars,
            minterms: spec.minterms.clone(),
            dont_cares: spec.dont_cares.clone(),
            expression: response.expression,
            legend,
            prime_implicants: response.prime_implicants,
            grid,
            render,
            statistics: response.statistics,
        }
    }

    /// The solved problem in its persisted form, expression included
    pub fn spec(&self) -> ProblemSpec {
        ProblemSpec {
            num_vars: self.num_vars,
            minterms: self.minterms.clone(),
            dont_cares: self.dont_cares.clone(),
            expression: Some(self.expression.clone()),
        }
    }

    /// Human readable legend, one term per line
    pub fn legend_text(&self) -> String {
        if self.legend.is_empty() {
            return format!("F = {}", self.expression);
        }
        let mut lines = vec![format!("F = {}", self.expression)];
        for entry in &self.legend {
            lines.push(format!(
                "  {}. {:<8} {} covers {}",
                entry.index + 1,
                entry.term,
                entry.color,
                entry.minterms.iter().join(", ")
            ));
        }
        lines.join("\n")
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize visualization")
    }

    /// Save the visualization as JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write visualization: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Settings;
    use crate::kmap::ProblemSpec;
    use crate::session::KmapProblem;
    use crate::solver::QuineMcCluskey;
    use tempfile::tempdir;

    fn corners() -> super::Visualization {
        KmapProblem::new(Settings::default(), ProblemSpec::new(4, vec![0, 2, 8, 10], vec![]))
            .unwrap()
            .solve(&QuineMcCluskey::default())
            .unwrap()
    }

    #[test]
    fn test_legend_text() {
        let text = corners().legend_text();
        assert!(text.starts_with("F = B'D'"));
        assert!(text.contains("#FF3B30 covers 0, 2, 8, 10"));
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&corners().to_json().unwrap()).unwrap();
        assert_eq!(json["expression"], "B'D'");
        assert_eq!(json["legend"][0]["pattern"], "-0-0");
        assert_eq!(json["render"]["loops"][0]["region"]["kind"], "wrapped_both");
        assert_eq!(json["render"]["loops"][0]["shapes"][0]["shape"], "corner_fragment");
        assert_eq!(json["render"]["loops"][0]["shapes"][0]["corner"], "top_left");
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("corners.json");
        corners().save_to_file(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("B'D'"));
    }

    #[test]
    fn test_spec_carries_expression() {
        let spec = corners().spec();
        assert_eq!(spec.expression.as_deref(), Some("B'D'"));
        assert_eq!(spec.minterms, vec![0, 2, 8, 10]);
    }
}
