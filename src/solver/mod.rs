//! Two-level minimization behind a pluggable solver interface

pub mod cover;
pub mod implicant;
pub mod quine_mccluskey;

pub use cover::{select_cover, CoverSelection, DEFAULT_EXACT_COVER_LIMIT};
pub use implicant::Implicant;
pub use quine_mccluskey::QuineMcCluskey;

use crate::error::KmapError;
use crate::expression::pattern::{check_variable_count, full_mask};
use crate::expression::BitPattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Anything that can minimize a (minterms, don't-cares) problem
pub trait MinimizationSolver {
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, KmapError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub num_vars: u32,
    pub minterms: Vec<u32>,
    #[serde(default)]
    pub dont_cares: Vec<u32>,
}

impl SolveRequest {
    pub fn new(num_vars: u32, minterms: Vec<u32>, dont_cares: Vec<u32>) -> Self {
        Self {
            num_vars,
            minterms,
            dont_cares,
        }
    }

    /// Check the variable count, index ranges, and that the two sets are disjoint
    pub fn validate(&self) -> Result<(), KmapError> {
        check_variable_count(self.num_vars)?;
        let max = full_mask(self.num_vars);

        if let Some(&minterm) = self.minterms.iter().chain(&self.dont_cares).find(|&&m| m > max) {
            return Err(KmapError::MintermOutOfRange {
                minterm,
                num_vars: self.num_vars,
            });
        }

        let on_set: BTreeSet<u32> = self.minterms.iter().copied().collect();
        if let Some(&overlap) = self.dont_cares.iter().find(|m| on_set.contains(m)) {
            return Err(KmapError::OverlappingDontCare(overlap));
        }
        Ok(())
    }
}

/// One product term of a solution with the inputs it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplicantRecord {
    pub pattern: BitPattern,
    pub covered_minterms: Vec<u32>,
}

impl ImplicantRecord {
    /// Record whose covered set is derived from the pattern itself
    pub fn from_pattern(pattern: BitPattern) -> Self {
        Self {
            covered_minterms: pattern.covered_minterms(),
            pattern,
        }
    }
}

impl From<&Implicant> for ImplicantRecord {
    fn from(implicant: &Implicant) -> Self {
        Self {
            pattern: implicant.pattern,
            covered_minterms: implicant.minterms.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStatistics {
    pub prime_count: usize,
    pub essential_count: usize,
    pub exact_cover: bool,
    pub solve_time: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    /// Minimal sum of products; `0` and `1` for the constant functions
    pub expression: String,
    /// Chosen cover in display order
    pub implicants: Vec<ImplicantRecord>,
    pub prime_implicants: Vec<ImplicantRecord>,
    #[serde(default)]
    pub statistics: SolveStatistics,
}
