//! Bit patterns over {0, 1, -} and the literals they stand for

use crate::error::KmapError;
use crate::kmap::VARIABLE_NAMES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest variable count accepted by the codec and solver
pub const MIN_VARIABLES: u32 = 2;
/// Largest variable count accepted by the codec and solver
pub const MAX_VARIABLES: u32 = 6;

/// Check that `num_vars` is within the codec/solver range
pub fn check_variable_count(num_vars: u32) -> Result<(), KmapError> {
    if (MIN_VARIABLES..=MAX_VARIABLES).contains(&num_vars) {
        Ok(())
    } else {
        Err(KmapError::UnsupportedVariableCount {
            found: num_vars,
            min: MIN_VARIABLES,
            max: MAX_VARIABLES,
        })
    }
}

/// One variable of a product term, possibly complemented
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Index into the declaration order A, B, C, ...
    pub variable: usize,
    pub negated: bool,
}

impl Literal {
    pub fn new(variable: usize, negated: bool) -> Self {
        Self { variable, negated }
    }

    pub fn name(&self) -> char {
        VARIABLE_NAMES[self.variable]
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if self.negated {
            write!(f, "'")?;
        }
        Ok(())
    }
}

/// An implicant written as one character per variable.
///
/// `mask` has a bit set for every fixed variable and `value` holds the
/// required bit for those positions. Variable `i` (A = 0) lives at bit
/// `num_vars - 1 - i`, so the string `"1-0"` means `A=1, C=0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitPattern {
    num_vars: u32,
    mask: u32,
    value: u32,
}

impl BitPattern {
    /// Create a pattern from a fixed-position mask and the required values
    pub fn new(num_vars: u32, mask: u32, value: u32) -> Result<Self, KmapError> {
        check_variable_count(num_vars)?;
        let full = full_mask(num_vars);
        if mask & !full != 0 {
            return Err(KmapError::InvalidBitPattern {
                pattern: format!("mask {:#b}", mask),
                reason: format!("mask has bits beyond {} variables", num_vars),
            });
        }
        Ok(Self {
            num_vars,
            mask,
            value: value & mask,
        })
    }

    /// Pattern fixing every variable to the bits of `minterm`
    pub fn from_minterm(num_vars: u32, minterm: u32) -> Result<Self, KmapError> {
        check_variable_count(num_vars)?;
        if minterm > full_mask(num_vars) {
            return Err(KmapError::MintermOutOfRange { minterm, num_vars });
        }
        Self::new(num_vars, full_mask(num_vars), minterm)
    }

    /// Pattern with no fixed variables, covering every minterm
    pub fn tautology(num_vars: u32) -> Result<Self, KmapError> {
        Self::new(num_vars, 0, 0)
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    #[inline]
    fn bit_of(&self, variable: usize) -> u32 {
        1 << (self.num_vars as usize - 1 - variable)
    }

    /// Required value of `variable`, or `None` when it is a don't-care position
    pub fn bit(&self, variable: usize) -> Option<bool> {
        if variable >= self.num_vars as usize {
            return None;
        }
        let bit = self.bit_of(variable);
        (self.mask & bit != 0).then(|| self.value & bit != 0)
    }

    /// Fixed positions as literals in variable order
    pub fn literals(&self) -> Vec<Literal> {
        (0..self.num_vars as usize)
            .filter_map(|variable| self.bit(variable).map(|bit| Literal::new(variable, !bit)))
            .collect()
    }

    pub fn literal_count(&self) -> u32 {
        self.mask.count_ones()
    }

    /// Number of minterms the pattern covers
    pub fn size(&self) -> usize {
        1 << (self.num_vars - self.literal_count())
    }

    /// Whether `minterm` agrees with every fixed position
    #[inline]
    pub fn covers(&self, minterm: u32) -> bool {
        minterm <= full_mask(self.num_vars) && (minterm & self.mask) == self.value
    }

    /// Every covered minterm, ascending
    pub fn covered_minterms(&self) -> Vec<u32> {
        (0..=full_mask(self.num_vars)).filter(|&m| self.covers(m)).collect()
    }
}

#[inline]
pub(crate) fn full_mask(num_vars: u32) -> u32 {
    (1u32 << num_vars) - 1
}

impl fmt::Display for BitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for variable in 0..self.num_vars as usize {
            let ch = match self.bit(variable) {
                Some(true) => '1',
                Some(false) => '0',
                None => '-',
            };
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

impl FromStr for BitPattern {
    type Err = KmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num_vars = s.chars().count() as u32;
        check_variable_count(num_vars).map_err(|_| KmapError::InvalidBitPattern {
            pattern: s.to_string(),
            reason: format!(
                "length {} is outside {}..={}",
                num_vars, MIN_VARIABLES, MAX_VARIABLES
            ),
        })?;

        let mut mask = 0;
        let mut value = 0;
        for ch in s.chars() {
            mask <<= 1;
            value <<= 1;
            match ch {
                '0' => mask |= 1,
                '1' => {
                    mask |= 1;
                    value |= 1;
                }
                '-' => {}
                other => {
                    return Err(KmapError::InvalidBitPattern {
                        pattern: s.to_string(),
                        reason: format!("unexpected character '{}'", other),
                    })
                }
            }
        }

        Self::new(num_vars, mask, value)
    }
}

impl TryFrom<String> for BitPattern {
    type Error = KmapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BitPattern> for String {
    fn from(pattern: BitPattern) -> Self {
        pattern.to_string()
    }
}
