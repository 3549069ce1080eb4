//! Solving many independent problems in parallel

use super::KmapProblem;
use crate::config::Settings;
use crate::kmap::{problems_to_csv, ProblemSpec};
use crate::solver::MinimizationSolver;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Result of one batch entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub index: usize,
    /// Input spec, with `expression` filled in when solving succeeded
    pub spec: ProblemSpec,
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn is_solved(&self) -> bool {
        self.error.is_none()
    }
}

/// Minimize every spec, in input order. Failures are recorded per entry.
pub fn solve_batch<S>(settings: &Settings, specs: &[ProblemSpec], solver: &S) -> Vec<BatchOutcome>
where
    S: MinimizationSolver + Sync + ?Sized,
{
    let outcomes: Vec<BatchOutcome> = specs
        .par_iter()
        .enumerate()
        .map(|(index, spec)| {
            let solved = KmapProblem::new(settings.clone(), spec.clone())
                .and_then(|problem| solver.solve(&problem.request()).map(|r| (problem, r)));

            match solved {
                Ok((problem, response)) => {
                    let mut spec = problem.spec().clone();
                    spec.expression = Some(response.expression);
                    BatchOutcome { index, spec, error: None }
                }
                Err(err) => {
                    warn!(index, error = %err, "batch entry failed");
                    BatchOutcome {
                        index,
                        spec: spec.clone(),
                        error: Some(err.to_string()),
                    }
                }
            }
        })
        .collect();

    let solved = outcomes.iter().filter(|o| o.is_solved()).count();
    info!(total = outcomes.len(), solved, "batch complete");
    outcomes
}

/// CSV of the solved entries
pub fn outcomes_to_csv(outcomes: &[BatchOutcome]) -> String {
    let solved: Vec<ProblemSpec> = outcomes
        .iter()
        .filter(|outcome| outcome.is_solved())
        .map(|outcome| outcome.spec.clone())
        .collect();
    problems_to_csv(&solved)
}

/// Write the CSV export to `path`
pub fn save_csv<P: AsRef<Path>>(outcomes: &[BatchOutcome], path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, outcomes_to_csv(outcomes))
        .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::QuineMcCluskey;
    use tempfile::tempdir;

    fn specs() -> Vec<ProblemSpec> {
        vec![
            ProblemSpec::new(3, vec![3, 4, 5], vec![]),
            ProblemSpec::new(4, vec![0, 2, 8, 10], vec![]),
            ProblemSpec::new(2, vec![1], vec![1]),
            ProblemSpec::new(5, vec![0, 1, 2, 3, 16, 17, 18, 19], vec![31]),
        ]
    }

    #[test]
    fn test_batch_keeps_order_and_failures() {
        let outcomes = solve_batch(&Settings::default(), &specs(), &QuineMcCluskey::default());
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes.iter().map(|o| o.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);

        assert_eq!(outcomes[0].spec.expression.as_deref(), Some("AB' + A'BC"));
        assert_eq!(outcomes[1].spec.expression.as_deref(), Some("B'D'"));
        assert!(!outcomes[2].is_solved());
        assert_eq!(outcomes[3].spec.expression.as_deref(), Some("B'C'"));
    }

    #[test]
    fn test_csv_export() {
        let outcomes = solve_batch(&Settings::default(), &specs(), &QuineMcCluskey::default());
        let csv = outcomes_to_csv(&outcomes);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Variables,Minterms,Dont Cares,Expression");
        assert_eq!(lines[1], "3,\"3,4,5\",\"\",AB' + A'BC");
        assert_eq!(lines[2], "4,\"0,2,8,10\",\"\",B'D'");
        assert_eq!(lines.len(), 4);

        let dir = tempdir().unwrap();
        let path = dir.path().join("batch.csv");
        save_csv(&outcomes, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), csv);
    }
}
