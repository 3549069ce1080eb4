//! Working implicants for the tabulation method

use crate::error::KmapError;
use crate::expression::BitPattern;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A product term together with every input it covers (don't-cares included)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Implicant {
    pub pattern: BitPattern,
    pub minterms: BTreeSet<u32>,
}

impl Implicant {
    /// Create a fully specified implicant for one input
    pub fn from_minterm(num_vars: u32, minterm: u32) -> Result<Self, KmapError> {
        Ok(Self {
            pattern: BitPattern::from_minterm(num_vars, minterm)?,
            minterms: BTreeSet::from([minterm]),
        })
    }

    /// Number of 1 bits in the pattern; the bucket key when combining
    pub fn ones(&self) -> u32 {
        self.pattern.value().count_ones()
    }

    pub fn literal_count(&self) -> u32 {
        self.pattern.literal_count()
    }

    pub fn covers(&self, minterm: u32) -> bool {
        self.minterms.contains(&minterm)
    }

    /// Merge two implicants that fix the same positions and disagree in exactly one
    pub fn combine(&self, other: &Implicant) -> Option<Implicant> {
        let (a, b) = (self.pattern, other.pattern);
        if a.num_vars() != b.num_vars() || a.mask() != b.mask() {
            return None;
        }
        let diff = a.value() ^ b.value();
        if diff.count_ones() != 1 {
            return None;
        }

        let pattern = BitPattern::new(a.num_vars(), a.mask() & !diff, a.value() & !diff).ok()?;
        Some(Implicant {
            pattern,
            minterms: self.minterms.union(&other.minterms).copied().collect(),
        })
    }

    /// Presentation order: fewest literals, then larger groups, then pattern text
    pub fn display_order(&self, other: &Implicant) -> Ordering {
        self.literal_count()
            .cmp(&other.literal_count())
            .then_with(|| other.minterms.len().cmp(&self.minterms.len()))
            .then_with(|| self.pattern.to_string().cmp(&other.pattern.to_string()))
    }
}
