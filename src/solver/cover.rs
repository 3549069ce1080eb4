//! Selecting a minimal set of prime implicants that covers every minterm

use super::implicant::Implicant;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Default number of non-essential primes up to which the cover is searched exhaustively
pub const DEFAULT_EXACT_COVER_LIMIT: usize = 15;

/// (term count, literal count), compared lexicographically
type Cost = (usize, u32);

/// Outcome of cover selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverSelection {
    /// Indices into the prime list, ascending
    pub chosen: Vec<usize>,
    pub essential_count: usize,
    /// Whether the non-essential part was solved exactly
    pub exact: bool,
}

/// Choose primes covering `minterms`: essentials first, then branch and bound
/// when at most `exact_limit` candidates remain, otherwise greedy.
pub fn select_cover(primes: &[Implicant], minterms: &[u32], exact_limit: usize) -> CoverSelection {
    let mut chart: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for &m in minterms {
        let covering = primes
            .iter()
            .enumerate()
            .filter(|(_, prime)| prime.covers(m))
            .map(|(idx, _)| idx)
            .collect();
        chart.insert(m, covering);
    }

    let mut chosen = BTreeSet::new();
    for covering in chart.values() {
        if let [only] = covering.as_slice() {
            chosen.insert(*only);
        }
    }
    let essential_count = chosen.len();

    let remaining: BTreeSet<u32> = chart
        .keys()
        .copied()
        .filter(|m| !chosen.iter().any(|&idx| primes[idx].covers(*m)))
        .collect();

    let candidates: Vec<usize> = (0..primes.len())
        .filter(|idx| !chosen.contains(idx))
        .filter(|&idx| remaining.iter().any(|&m| primes[idx].covers(m)))
        .collect();

    debug!(
        primes = primes.len(),
        essential = essential_count,
        remaining = remaining.len(),
        candidates = candidates.len(),
        "selecting cover"
    );

    let exact = candidates.len() <= exact_limit;
    let extra = if remaining.is_empty() {
        Vec::new()
    } else if exact {
        BranchAndBound::new(primes, &candidates).run(&remaining)
    } else {
        greedy(primes, &candidates, remaining)
    };

    chosen.extend(extra);
    CoverSelection {
        chosen: chosen.into_iter().collect(),
        essential_count,
        exact,
    }
}

struct BranchAndBound<'a> {
    primes: &'a [Implicant],
    candidates: &'a [usize],
    best: Option<(Cost, Vec<usize>)>,
}

impl<'a> BranchAndBound<'a> {
    fn new(primes: &'a [Implicant], candidates: &'a [usize]) -> Self {
        Self {
            primes,
            candidates,
            best: None,
        }
    }

    fn run(mut self, remaining: &BTreeSet<u32>) -> Vec<usize> {
        let mut picked = Vec::new();
        self.search(remaining, &mut picked, 0);
        self.best.map(|(_, picked)| picked).unwrap_or_default()
    }

    fn search(&mut self, remaining: &BTreeSet<u32>, picked: &mut Vec<usize>, literals: u32) {
        if remaining.is_empty() {
            let cost = (picked.len(), literals);
            if self.best.as_ref().map_or(true, |(best, _)| cost < *best) {
                self.best = Some((cost, picked.clone()));
            }
            return;
        }

        // Any completion needs at least one more term
        if let Some((best, _)) = &self.best {
            if (picked.len() + 1, literals) >= *best {
                return;
            }
        }

        // Branch on the minterm with the fewest options
        let Some((_, options)) = remaining
            .iter()
            .map(|&m| {
                let options: Vec<usize> = self
                    .candidates
                    .iter()
                    .copied()
                    .filter(|&idx| self.primes[idx].covers(m))
                    .collect();
                (m, options)
            })
            .min_by_key(|(m, options)| (options.len(), *m))
        else {
            return;
        };

        for idx in options {
            let prime = &self.primes[idx];
            let rest: BTreeSet<u32> = remaining.iter().copied().filter(|&m| !prime.covers(m)).collect();
            picked.push(idx);
            self.search(&rest, picked, literals + prime.literal_count());
            picked.pop();
        }
    }
}

/// Repeatedly take the prime covering the most uncovered minterms, fewer literals on ties
fn greedy(primes: &[Implicant], candidates: &[usize], mut remaining: BTreeSet<u32>) -> Vec<usize> {
    let mut picked = Vec::new();
    while !remaining.is_empty() {
        let best = candidates
            .iter()
            .copied()
            .filter(|idx| !picked.contains(idx))
            .map(|idx| {
                let gain = remaining.iter().filter(|&&m| primes[idx].covers(m)).count();
                (idx, gain)
            })
            .filter(|&(_, gain)| gain > 0)
            .max_by(|&(a, gain_a), &(b, gain_b)| {
                gain_a
                    .cmp(&gain_b)
                    .then_with(|| primes[b].literal_count().cmp(&primes[a].literal_count()))
                    .then_with(|| b.cmp(&a))
            });

        let Some((idx, _)) = best else {
            break;
        };
        remaining.retain(|&m| !primes[idx].covers(m));
        picked.push(idx);
    }
    picked
}
