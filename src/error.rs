//! Error types shared by the mapping, grouping, codec and solver layers

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the Karnaugh map core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KmapError {
    #[error("unsupported variable count {found} (supported: {min}..={max})")]
    UnsupportedVariableCount { found: u32, min: u32, max: u32 },

    #[error("invalid group shape for minterms {minterms:?}: {reason}")]
    InvalidGroupShape {
        minterms: Vec<u32>,
        reason: InvalidShapeReason,
    },

    #[error("malformed expression {expression:?}: {reason}")]
    MalformedExpression { expression: String, reason: String },

    #[error("minterm {minterm} out of range for {num_vars} variables")]
    MintermOutOfRange { minterm: u32, num_vars: u32 },

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("grid is {found_rows}x{found_cols} but the layout is {rows}x{cols}")]
    GridDimensionMismatch {
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    #[error("invalid bit pattern {pattern:?}: {reason}")]
    InvalidBitPattern { pattern: String, reason: String },

    #[error("minterm {0} is listed both as a minterm and as a don't-care")]
    OverlappingDontCare(u32),

    #[error("implicant {pattern} covers {expected:?} but the solver reported {reported:?}")]
    InconsistentImplicant {
        pattern: String,
        expected: Vec<u32>,
        reported: Vec<u32>,
    },

    #[error("no cell geometry available for ({row}, {col})")]
    MissingCellGeometry { row: usize, col: usize },
}

/// Why a covered-minterm set was rejected as a loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum InvalidShapeReason {
    #[error("group is empty")]
    Empty,

    #[error("{count} cells is not a power of two")]
    NotPowerOfTwo { count: usize },

    #[error("{count} cells exceed the grid capacity of {capacity}")]
    TooLarge { count: usize, capacity: usize },

    #[error("occupied rows are not contiguous, even with wraparound")]
    NonContiguousRows,

    #[error("occupied columns are not contiguous, even with wraparound")]
    NonContiguousCols,

    #[error("{count} cells do not fill the {rows}x{cols} bounding box")]
    IncompleteBoundingBox {
        count: usize,
        rows: usize,
        cols: usize,
    },

    #[error("minterm {0} is outside the grid")]
    MintermOutOfRange(u32),
}

impl KmapError {
    /// Whether the render pass may skip the offending implicant and keep going
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            KmapError::InvalidGroupShape { .. } | KmapError::InconsistentImplicant { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = KmapError::UnsupportedVariableCount { found: 5, min: 2, max: 4 };
        assert_eq!(err.to_string(), "unsupported variable count 5 (supported: 2..=4)");

        let err = KmapError::InvalidGroupShape {
            minterms: vec![0, 1, 2],
            reason: InvalidShapeReason::NotPowerOfTwo { count: 3 },
        };
        assert!(err.to_string().contains("3 cells is not a power of two"));
    }

    #[test]
    fn test_recoverable_classification() {
        let shape = KmapError::InvalidGroupShape {
            minterms: vec![],
            reason: InvalidShapeReason::Empty,
        };
        assert!(shape.is_recoverable());

        let malformed = KmapError::MalformedExpression {
            expression: String::new(),
            reason: "no terms".to_string(),
        };
        assert!(!malformed.is_recoverable());

        let missing = KmapError::MissingCellGeometry { row: 0, col: 1 };
        assert!(!missing.is_recoverable());
    }
}
