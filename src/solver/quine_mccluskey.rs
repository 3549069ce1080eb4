//! Tabulation (Quine-McCluskey) minimizer

use super::cover::{select_cover, DEFAULT_EXACT_COVER_LIMIT};
use super::implicant::Implicant;
use super::{ImplicantRecord, MinimizationSolver, SolveRequest, SolveResponse, SolveStatistics};
use crate::error::KmapError;
use crate::expression::{render_expression, BitPattern};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::debug;

/// Exact two-level minimizer with a greedy fallback for large charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuineMcCluskey {
    exact_cover_limit: usize,
}

impl Default for QuineMcCluskey {
    fn default() -> Self {
        Self::new(DEFAULT_EXACT_COVER_LIMIT)
    }
}

impl QuineMcCluskey {
    /// Create a solver that searches covers exhaustively up to `exact_cover_limit` candidates
    pub fn new(exact_cover_limit: usize) -> Self {
        Self { exact_cover_limit }
    }

    pub fn exact_cover_limit(&self) -> usize {
        self.exact_cover_limit
    }

    /// All prime implicants of the on-set plus don't-cares, in display order
    pub fn prime_implicants(&self, request: &SolveRequest) -> Result<Vec<Implicant>, KmapError> {
        let terms: BTreeSet<u32> = request
            .minterms
            .iter()
            .chain(&request.dont_cares)
            .copied()
            .collect();

        let mut current = terms
            .iter()
            .map(|&m| Implicant::from_minterm(request.num_vars, m))
            .collect::<Result<Vec<_>, _>>()?;
        let mut primes = Vec::new();
        let mut round = 0;

        while !current.is_empty() {
            // Bucket by fixed positions and number of ones; only neighbours can merge
            let mut buckets: BTreeMap<(u32, u32), Vec<usize>> = BTreeMap::new();
            for (idx, implicant) in current.iter().enumerate() {
                buckets
                    .entry((implicant.pattern.mask(), implicant.ones()))
                    .or_default()
                    .push(idx);
            }

            let mut used = vec![false; current.len()];
            let mut next: BTreeMap<BitPattern, Implicant> = BTreeMap::new();

            for (&(mask, ones), lower) in &buckets {
                let Some(upper) = buckets.get(&(mask, ones + 1)) else {
                    continue;
                };
                for &i in lower {
                    for &j in upper {
                        if let Some(merged) = current[i].combine(&current[j]) {
                            used[i] = true;
                            used[j] = true;
                            next.entry(merged.pattern).or_insert(merged);
                        }
                    }
                }
            }

            primes.extend(
                current
                    .into_iter()
                    .zip(used)
                    .filter(|(_, used)| !used)
                    .map(|(implicant, _)| implicant),
            );

            debug!(round, merged = next.len(), primes = primes.len(), "combination round");
            current = next.into_values().collect();
            round += 1;
        }

        // Primes made only of don't-cares never help a cover
        let on_set: BTreeSet<u32> = request.minterms.iter().copied().collect();
        primes.retain(|prime: &Implicant| prime.minterms.iter().any(|m| on_set.contains(m)));
        primes.sort_by(Implicant::display_order);
        Ok(primes)
    }
}

impl MinimizationSolver for QuineMcCluskey {
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, KmapError> {
        request.validate()?;
        let start = Instant::now();

        let minterms: Vec<u32> = request.minterms.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if minterms.is_empty() {
            return Ok(SolveResponse {
                expression: render_expression(&[]),
                implicants: Vec::new(),
                prime_implicants: Vec::new(),
                statistics: SolveStatistics {
                    solve_time: start.elapsed(),
                    ..SolveStatistics::default()
                },
            });
        }

        let primes = self.prime_implicants(request)?;
        let selection = select_cover(&primes, &minterms, self.exact_cover_limit);

        let mut cover: Vec<&Implicant> = selection.chosen.iter().map(|&idx| &primes[idx]).collect();
        cover.sort_by(|a, b| a.display_order(b));

        let patterns: Vec<BitPattern> = cover.iter().map(|implicant| implicant.pattern).collect();
        let expression = render_expression(&patterns);

        debug!(
            num_vars = request.num_vars,
            minterms = minterms.len(),
            terms = cover.len(),
            exact = selection.exact,
            %expression,
            "minimized"
        );

        Ok(SolveResponse {
            expression,
            implicants: cover.into_iter().map(ImplicantRecord::from).collect(),
            statistics: SolveStatistics {
                prime_count: primes.len(),
                essential_count: selection.essential_count,
                exact_cover: selection.exact,
                solve_time: start.elapsed(),
            },
            prime_implicants: primes.iter().map(ImplicantRecord::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(num_vars: u32, minterms: &[u32], dont_cares: &[u32]) -> SolveResponse {
        QuineMcCluskey::default()
            .solve(&SolveRequest::new(num_vars, minterms.to_vec(), dont_cares.to_vec()))
            .unwrap()
    }

    #[test]
    fn test_four_corners() {
        assert_eq!(solve(4, &[0, 2, 8, 10], &[]).expression, "B'D'");
    }

    #[test]
    fn test_known_minimizations() {
        assert_eq!(solve(3, &[0, 1, 2, 3], &[]).expression, "A'");
        assert_eq!(solve(2, &[1, 2], &[]).expression, "A'B + AB'");
        assert_eq!(solve(3, &[3, 4, 5], &[]).expression, "AB' + A'BC");
        assert_eq!(solve(4, &[0, 1, 2, 3, 8, 9, 10, 11], &[]).expression, "B'");
        assert_eq!(solve(4, &[1, 3, 5, 7, 9, 11, 13, 15], &[]).expression, "D");
    }

    #[test]
    fn test_dont_cares_enlarge_groups() {
        // 1, 3, 7 with 5 free gives A'D style grouping in three variables: A'C
        let response = solve(3, &[1, 3, 7], &[5]);
        assert_eq!(response.expression, "C");
        assert_eq!(response.implicants[0].covered_minterms, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_constant_functions() {
        let empty = solve(3, &[], &[1, 2]);
        assert_eq!(empty.expression, "0");
        assert!(empty.implicants.is_empty());

        let full = solve(2, &[0, 1, 2, 3], &[]);
        assert_eq!(full.expression, "1");
        assert_eq!(full.implicants.len(), 1);
        assert_eq!(full.implicants[0].pattern.to_string(), "--");
    }

    #[test]
    fn test_cover_equals_on_set() {
        let minterms = [0, 1, 2, 5, 6, 7, 8, 9, 10, 14];
        let dont_cares = [3, 11];
        let response = solve(4, &minterms, &dont_cares);

        let covered: BTreeSet<u32> = response
            .implicants
            .iter()
            .flat_map(|record| record.covered_minterms.iter().copied())
            .collect();
        for m in minterms {
            assert!(covered.contains(&m));
        }
        for m in covered {
            assert!(minterms.contains(&m) || dont_cares.contains(&m));
        }
    }

    #[test]
    fn test_prime_implicants_listed() {
        let response = solve(3, &[0, 1, 3, 4, 6, 7], &[]);
        assert_eq!(response.prime_implicants.len(), 6);
        assert_eq!(response.implicants.len(), 3);
        assert_eq!(response.statistics.essential_count, 0);
    }

    #[test]
    fn test_records_match_patterns() {
        let response = solve(4, &[4, 5, 6, 7, 12, 13, 14, 15, 0], &[]);
        for record in &response.implicants {
            assert_eq!(record.pattern.covered_minterms(), record.covered_minterms);
        }
    }

    #[test]
    fn test_five_and_six_variables() {
        let response = solve(5, &[0, 4, 16, 20], &[]);
        assert_eq!(response.expression, "B'D'E'");
        let response = solve(6, &(0..32).collect::<Vec<_>>(), &[]);
        assert_eq!(response.expression, "A'");
    }

    #[test]
    fn test_rejects_invalid_requests() {
        let solver = QuineMcCluskey::default();
        assert!(matches!(
            solver.solve(&SolveRequest::new(7, vec![1], vec![])),
            Err(KmapError::UnsupportedVariableCount { .. })
        ));
        assert!(matches!(
            solver.solve(&SolveRequest::new(2, vec![4], vec![])),
            Err(KmapError::MintermOutOfRange { minterm: 4, .. })
        ));
        assert!(matches!(
            solver.solve(&SolveRequest::new(2, vec![1], vec![1])),
            Err(KmapError::OverlappingDontCare(1))
        ));
    }
}
